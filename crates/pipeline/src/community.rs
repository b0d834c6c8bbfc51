//! Community sharing: fork, unfork, and clone-to-account operations.
//!
//! Sharing forks a personal collection into an independently owned
//! structural copy; cloning runs the fork in reverse, into the calling
//! user's account. Copies never share row identity with their source, so
//! edits on either side of the boundary never propagate.

use curio_core::error::CoreError;
use curio_core::listing::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use curio_core::types::DbId;
use curio_db::models::collection::{Collection, CreateCollection};
use curio_db::models::community::{
    CommunityCollection, CommunityItem, CreateCommunityCollection, CreateCommunityItem,
};
use curio_db::models::item::{CreateItem, Item};
use curio_db::models::recommended::{RecommendedCollection, RecommendedItem};
use curio_db::models::user::AuthorSummary;
use curio_db::store::Store;
use serde::{Deserialize, Serialize};

use crate::achievements::check_achievements;
use crate::context::AuthContext;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body for sharing a collection to the community.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ShareRequest {
    pub collection_id: DbId,
}

/// A community fork with its items and author, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SharedCollection {
    pub collection: CommunityCollection,
    pub items: Vec<CommunityItem>,
    pub author: AuthorSummary,
}

/// Request body for withdrawing a community share.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnshareRequest {
    pub collection_id: DbId,
}

/// Response body for a successful unshare.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnshareResponse {
    pub success: bool,
}

/// What a clone-to-account call copies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CloneSource {
    Community(DbId),
    Recommended(DbId),
}

/// A freshly cloned personal collection, plus any achievements the clone
/// unlocked for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ClonedCollection {
    pub collection: Collection,
    pub items: Vec<Item>,
    pub newly_unlocked_achievements: Vec<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Share a collection to the community.
///
/// Creates a community collection deep-copying the source's descriptive
/// fields and items in one atomic write, then points the source at the new
/// fork. Re-sharing an already shared collection is allowed: the link
/// moves to the newest fork and the previous fork stays behind, orphaned.
pub async fn share<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: ShareRequest,
) -> Result<SharedCollection, CoreError> {
    let auth = AuthContext::require(auth)?;

    let collection = store
        .find_collection(request.collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: request.collection_id,
        })?;
    if collection.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Only the owner can share a collection".into(),
        ));
    }

    let author = store
        .find_user(auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    let items = store.list_items_for_collection(collection.id).await?;
    let (community, community_items) = store
        .create_community_collection_with_items(
            community_snapshot(&collection),
            items.iter().map(community_item_snapshot).collect(),
        )
        .await?;

    if let Some(previous) = collection.shared_to_community_id {
        tracing::warn!(
            collection_id = collection.id,
            previous_fork = previous,
            new_fork = community.id,
            "collection re-shared; previous fork is now orphaned"
        );
    }
    store
        .set_shared_to_community(collection.id, Some(community.id))
        .await?;

    check_achievements(store, auth.user_id).await;

    tracing::info!(
        collection_id = collection.id,
        community_id = community.id,
        user_id = auth.user_id,
        items = community_items.len(),
        "collection shared to community"
    );

    Ok(SharedCollection {
        collection: community,
        items: community_items,
        author: AuthorSummary::from(&author),
    })
}

/// Withdraw a community share.
///
/// Deletes the community fork and all its items in one atomic write, then
/// clears the source collection's link. Reports `NotFound` if the fork was
/// already deleted independently rather than silently succeeding.
pub async fn unshare<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: UnshareRequest,
) -> Result<UnshareResponse, CoreError> {
    let auth = AuthContext::require(auth)?;

    let collection = store
        .find_collection(request.collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: request.collection_id,
        })?;
    if collection.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Only the owner can unshare a collection".into(),
        ));
    }

    let community_id = collection.shared_to_community_id.ok_or_else(|| {
        CoreError::Validation("Collection is not shared to the community".into())
    })?;

    let community = store
        .find_community_collection(community_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CommunityCollection",
            id: community_id,
        })?;
    // The link should only ever point at the caller's own fork; treat a
    // mismatch as tampering.
    if community.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Community collection belongs to another account".into(),
        ));
    }

    store.delete_community_collection_cascade(community_id).await?;
    store.set_shared_to_community(collection.id, None).await?;

    tracing::info!(
        collection_id = collection.id,
        community_id,
        user_id = auth.user_id,
        "community share withdrawn"
    );

    Ok(UnshareResponse { success: true })
}

/// Clone a community or recommended collection into the caller's account.
///
/// The new collection copies descriptive fields, the custom-field schema,
/// and per-item custom-field values verbatim; every cloned item starts
/// unowned. A lineage reference records the source; ownership, share
/// links, and tokens are never copied.
pub async fn add_to_account<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    source: CloneSource,
) -> Result<ClonedCollection, CoreError> {
    let auth = AuthContext::require(auth)?;

    let (create, items) = match source {
        CloneSource::Community(id) => {
            let community = store
                .find_community_collection(id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "CommunityCollection",
                    id,
                })?;
            let items = store.list_community_items(id).await?;
            clone_from_community(auth.user_id, &community, &items)
        }
        CloneSource::Recommended(id) => {
            let recommended = store
                .find_recommended_collection(id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "RecommendedCollection",
                    id,
                })?;
            let items = store.list_recommended_items(id).await?;
            clone_from_recommended(auth.user_id, &recommended, &items)
        }
    };

    let (collection, items) = store.create_collection_with_items(create, items).await?;
    let newly_unlocked_achievements = check_achievements(store, auth.user_id).await;

    tracing::info!(
        source = ?source,
        collection_id = collection.id,
        user_id = auth.user_id,
        items = items.len(),
        "collection cloned to account"
    );

    Ok(ClonedCollection {
        collection,
        items,
        newly_unlocked_achievements,
    })
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// Browse the community marketplace, newest first. Public.
pub async fn browse_community<S: Store + ?Sized>(
    store: &S,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<CommunityCollection>, CoreError> {
    let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);
    Ok(store.list_community_collections(limit, offset).await?)
}

/// Browse the recommended catalog, newest first. Public.
pub async fn browse_recommended<S: Store + ?Sized>(
    store: &S,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<RecommendedCollection>, CoreError> {
    let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);
    Ok(store.list_recommended_collections(limit, offset).await?)
}

// ---------------------------------------------------------------------------
// Copy helpers
// ---------------------------------------------------------------------------

/// Descriptive-field snapshot of a collection for its community fork.
fn community_snapshot(collection: &Collection) -> CreateCommunityCollection {
    CreateCommunityCollection {
        user_id: collection.user_id,
        name: collection.name.clone(),
        description: collection.description.clone(),
        category: collection.category.clone(),
        template: collection.template.clone(),
        custom_field_definitions: collection.custom_field_definitions.clone(),
        cover_image: collection.cover_image.clone(),
        cover_image_fit: collection.cover_image_fit,
        tags: collection.tags.clone(),
    }
}

/// Descriptive-field snapshot of one item for the community fork.
///
/// Ownership stays behind: owned/not-owned is per-user state, not part of
/// the shared copy.
fn community_item_snapshot(item: &Item) -> CreateCommunityItem {
    CreateCommunityItem {
        name: item.name.clone(),
        number: item.number,
        notes: item.notes.clone(),
        image: item.image.clone(),
        custom_fields: item.custom_fields.clone(),
    }
}

fn clone_from_community(
    user_id: DbId,
    source: &CommunityCollection,
    items: &[CommunityItem],
) -> (CreateCollection, Vec<CreateItem>) {
    let create = CreateCollection {
        user_id,
        name: source.name.clone(),
        description: source.description.clone(),
        category: source.category.clone(),
        template: source.template.clone(),
        custom_field_definitions: source.custom_field_definitions.clone(),
        cover_image: source.cover_image.clone(),
        cover_image_fit: source.cover_image_fit,
        tags: source.tags.clone(),
        folder_id: None,
        source_recommended_id: None,
        source_community_id: Some(source.id),
    };
    let items = items
        .iter()
        .map(|item| CreateItem {
            name: item.name.clone(),
            number: item.number,
            notes: item.notes.clone(),
            image: item.image.clone(),
            is_owned: false,
            custom_fields: item.custom_fields.clone(),
        })
        .collect();
    (create, items)
}

fn clone_from_recommended(
    user_id: DbId,
    source: &RecommendedCollection,
    items: &[RecommendedItem],
) -> (CreateCollection, Vec<CreateItem>) {
    let create = CreateCollection {
        user_id,
        name: source.name.clone(),
        description: source.description.clone(),
        category: source.category.clone(),
        template: source.template.clone(),
        custom_field_definitions: source.custom_field_definitions.clone(),
        cover_image: source.cover_image.clone(),
        cover_image_fit: source.cover_image_fit,
        tags: source.tags.clone(),
        folder_id: None,
        source_recommended_id: Some(source.id),
        source_community_id: None,
    };
    let items = items
        .iter()
        .map(|item| CreateItem {
            name: item.name.clone(),
            number: item.number,
            notes: item.notes.clone(),
            image: item.image.clone(),
            is_owned: false,
            custom_fields: item.custom_fields.clone(),
        })
        .collect();
    (create, items)
}
