//! Admin operations: bulk cover generation, bulk item-image assignment,
//! recommended-catalog curation, and user moderation toggles.
//!
//! The two bulk operations deliberately differ in failure policy. Cover
//! generation tolerates per-collection failures and reports them in a
//! structured error list, so one bad render never aborts the sweep. The
//! item-image batch is all-or-nothing: a single foreign item id rejects
//! the whole request before anything is written.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use curio_core::custom_fields;
use curio_core::error::CoreError;
use curio_core::types::DbId;
use curio_db::models::collection::UpdateCollection;
use curio_db::models::item::{Item, ItemImageUpdate};
use curio_db::models::recommended::{
    CreateRecommendedCollection, CreateRecommendedItem, RecommendedCollection, RecommendedItem,
    UpdateRecommendedCollection,
};
use curio_db::models::user::User;
use curio_db::store::Store;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::context::AuthContext;

/// Maximum length for a user badge.
pub const MAX_BADGE_LENGTH: usize = 40;

// ---------------------------------------------------------------------------
// Cover generation collaborator
// ---------------------------------------------------------------------------

/// External cover-rendering service.
#[async_trait]
pub trait CoverGenerator: Send + Sync {
    /// Render a cover image for a collection, returning an image
    /// reference. May fail per call; bulk callers record the failure and
    /// continue.
    async fn generate(&self, name: &str, category: Option<&str>) -> Result<String, CoverError>;
}

/// Failure from the cover-rendering service.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("Cover rendering failed: {0}")]
    Render(String),
}

// ---------------------------------------------------------------------------
// Bulk cover generation
// ---------------------------------------------------------------------------

/// One failed collection in a bulk cover run, keyed by collection name.
#[derive(Debug, Clone, Serialize)]
pub struct BulkCoverError {
    pub collection: String,
    pub message: String,
}

/// Outcome of a bulk cover run.
///
/// `generated` and `updated` are reported separately because they can
/// diverge: a cover may render and then fail to persist.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkCoverReport {
    pub scanned: usize,
    pub generated: usize,
    pub updated: usize,
    pub errors: Vec<BulkCoverError>,
}

/// Generate covers for every collection that has none.
///
/// Each render runs under the configured external-call timeout. A render
/// failure or timeout is recorded against the collection's name and the
/// sweep continues; the operation as a whole only fails on auth or on the
/// initial scan.
pub async fn bulk_generate_covers<S, G>(
    store: &S,
    auth: Option<&AuthContext>,
    generator: &G,
    config: &PipelineConfig,
) -> Result<BulkCoverReport, CoreError>
where
    S: Store + ?Sized,
    G: CoverGenerator + ?Sized,
{
    let auth = AuthContext::require_admin(auth)?;

    let missing = store.list_collections_missing_covers().await?;
    let budget = Duration::from_secs(config.external_call_timeout_secs);

    let mut report = BulkCoverReport {
        scanned: missing.len(),
        ..BulkCoverReport::default()
    };

    for collection in missing {
        let rendered = tokio::time::timeout(
            budget,
            generator.generate(&collection.name, collection.category.as_deref()),
        )
        .await;

        let image = match rendered {
            Ok(Ok(image)) => image,
            Ok(Err(err)) => {
                report.errors.push(BulkCoverError {
                    collection: collection.name.clone(),
                    message: err.to_string(),
                });
                continue;
            }
            Err(_) => {
                report.errors.push(BulkCoverError {
                    collection: collection.name.clone(),
                    message: format!(
                        "cover rendering timed out after {}s",
                        config.external_call_timeout_secs
                    ),
                });
                continue;
            }
        };
        report.generated += 1;

        let update = UpdateCollection {
            cover_image: Some(image),
            ..UpdateCollection::default()
        };
        match store.update_collection(collection.id, update).await {
            Ok(Some(_)) => report.updated += 1,
            Ok(None) => report.errors.push(BulkCoverError {
                collection: collection.name.clone(),
                message: "collection disappeared during the run".into(),
            }),
            Err(err) => report.errors.push(BulkCoverError {
                collection: collection.name.clone(),
                message: err.to_string(),
            }),
        }
    }

    tracing::info!(
        admin_id = auth.user_id,
        scanned = report.scanned,
        generated = report.generated,
        updated = report.updated,
        failed = report.errors.len(),
        "bulk cover generation finished"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Bulk item-image assignment
// ---------------------------------------------------------------------------

/// Request body for a bulk item-image assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemImageRequest {
    pub collection_id: DbId,
    pub updates: Vec<ItemImageUpdate>,
}

/// Response body for a bulk item-image assignment.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemImageResponse {
    pub updated: usize,
    pub items: Vec<Item>,
}

/// Assign images to many items of one collection in a single atomic batch.
///
/// The batch is validated in full before any write: an empty list, an
/// oversized list, or any item id that does not belong to the collection
/// rejects the entire request with zero items updated.
pub async fn bulk_update_item_images<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: BulkItemImageRequest,
) -> Result<BulkItemImageResponse, CoreError> {
    bulk_update_item_images_with_config(store, auth, request, &PipelineConfig::default()).await
}

/// [`bulk_update_item_images`] with an explicit batch-size cap.
pub async fn bulk_update_item_images_with_config<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: BulkItemImageRequest,
    config: &PipelineConfig,
) -> Result<BulkItemImageResponse, CoreError> {
    let auth = AuthContext::require_admin(auth)?;

    if request.updates.is_empty() {
        return Err(CoreError::Validation("Updates must not be empty".into()));
    }
    if request.updates.len() > config.max_bulk_item_updates {
        return Err(CoreError::Validation(format!(
            "Too many updates: {} (maximum {})",
            request.updates.len(),
            config.max_bulk_item_updates
        )));
    }

    store
        .find_collection(request.collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: request.collection_id,
        })?;

    // All-or-nothing membership check before any write.
    let member_ids: HashSet<DbId> = store
        .list_items_for_collection(request.collection_id)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect();
    for update in &request.updates {
        if !member_ids.contains(&update.item_id) {
            return Err(CoreError::Validation(format!(
                "Item {} does not belong to collection {}",
                update.item_id, request.collection_id
            )));
        }
    }

    let items = store
        .update_item_images(request.collection_id, &request.updates)
        .await?;

    tracing::info!(
        admin_id = auth.user_id,
        collection_id = request.collection_id,
        updated = items.len(),
        "bulk item images assigned"
    );
    Ok(BulkItemImageResponse {
        updated: items.len(),
        items,
    })
}

// ---------------------------------------------------------------------------
// Recommended catalog curation
// ---------------------------------------------------------------------------

/// Request body for creating a recommended collection with its items.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecommendedRequest {
    #[serde(flatten)]
    pub collection: CreateRecommendedCollection,
    #[serde(default)]
    pub items: Vec<CreateRecommendedItem>,
}

/// Create a recommended collection. Admin only.
pub async fn create_recommended_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: CreateRecommendedRequest,
) -> Result<(RecommendedCollection, Vec<RecommendedItem>), CoreError> {
    let auth = AuthContext::require_admin(auth)?;

    if request.collection.name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if let Some(ref definitions) = request.collection.custom_field_definitions {
        custom_fields::validate_definitions(definitions).map_err(CoreError::Validation)?;
    }
    let definitions = request.collection.custom_field_definitions.as_deref();
    for item in &request.items {
        if let Some(ref values) = item.custom_fields {
            custom_fields::validate_values(definitions, values).map_err(CoreError::Validation)?;
        }
    }

    let (collection, items) = store
        .create_recommended_collection_with_items(request.collection, request.items)
        .await?;

    tracing::info!(
        admin_id = auth.user_id,
        recommended_id = collection.id,
        items = items.len(),
        "recommended collection created"
    );
    Ok((collection, items))
}

/// Update a recommended collection's descriptive fields. Admin only.
pub async fn update_recommended_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    recommended_id: DbId,
    update: UpdateRecommendedCollection,
) -> Result<RecommendedCollection, CoreError> {
    AuthContext::require_admin(auth)?;

    store
        .update_recommended_collection(recommended_id, update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "RecommendedCollection",
            id: recommended_id,
        })
}

/// Delete a recommended collection and its items. Admin only.
pub async fn delete_recommended_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    recommended_id: DbId,
) -> Result<(), CoreError> {
    AuthContext::require_admin(auth)?;

    let removed = store
        .delete_recommended_collection_cascade(recommended_id)
        .await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "RecommendedCollection",
            id: recommended_id,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// User moderation
// ---------------------------------------------------------------------------

/// Set or clear a user's verified flag. Admin only.
pub async fn set_user_verified<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    user_id: DbId,
    verified: bool,
) -> Result<User, CoreError> {
    let auth = AuthContext::require_admin(auth)?;

    let user = store
        .set_user_verified(user_id, verified)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    tracing::info!(admin_id = auth.user_id, user_id, verified, "user verification set");
    Ok(user)
}

/// Set or clear a user's display badge. Admin only.
pub async fn set_user_badge<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    user_id: DbId,
    badge: Option<String>,
) -> Result<User, CoreError> {
    AuthContext::require_admin(auth)?;

    if let Some(ref badge) = badge {
        if badge.trim().is_empty() {
            return Err(CoreError::Validation("Badge must not be empty".into()));
        }
        if badge.len() > MAX_BADGE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Badge exceeds {MAX_BADGE_LENGTH} characters"
            )));
        }
    }

    store
        .set_user_badge(user_id, badge)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })
}
