//! Collection and item maintenance operations.
//!
//! The thin CRUD surface the engines hang off: every mutation here feeds
//! the statistics the achievement engine evaluates, and the list read runs
//! through the request-deduplication cache.

use std::sync::Arc;

use curio_core::cache::RequestCache;
use curio_core::custom_fields::{self, CustomFieldDefinition};
use curio_core::error::CoreError;
use curio_core::listing::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use curio_core::types::DbId;
use curio_db::models::collection::{
    Collection, CoverImageFit, CreateCollection, UpdateCollection,
};
use curio_db::models::item::{CreateItem, Item, UpdateItem};
use curio_db::store::Store;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements::check_achievements;
use crate::context::AuthContext;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for collection and item names.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum number of tags on a collection.
pub const MAX_TAGS: usize = 25;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 40;

/// Maximum items accepted in one bulk import.
pub const MAX_IMPORT_ITEMS: usize = 1_000;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a collection.
///
/// The owner comes from the auth context, never from the payload; the
/// custom-field schema is fixed at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub custom_field_definitions: Option<Vec<CustomFieldDefinition>>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub cover_image_fit: CoverImageFit,
    #[serde(default)]
    pub tags: Vec<String>,
    pub folder_id: Option<DbId>,
}

/// Query parameters for listing a user's collections.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListCollectionsParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A collection with its items in `(number, name)` order.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionWithItems {
    pub collection: Collection,
    pub items: Vec<Item>,
}

/// Outcome of a bulk item import.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImportItemsReport {
    pub requested: usize,
    pub created: usize,
    /// Items skipped because an identical `(name, number)` already exists.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Collection operations
// ---------------------------------------------------------------------------

/// Create a collection owned by the caller.
pub async fn create_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: CreateCollectionRequest,
) -> Result<Collection, CoreError> {
    let auth = AuthContext::require(auth)?;

    validate_name(&request.name)?;
    validate_tags(&request.tags)?;
    if let Some(ref definitions) = request.custom_field_definitions {
        custom_fields::validate_definitions(definitions).map_err(CoreError::Validation)?;
    }
    if let Some(folder_id) = request.folder_id {
        let folder = store
            .find_folder(folder_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Folder",
                id: folder_id,
            })?;
        if folder.user_id != auth.user_id {
            return Err(CoreError::Forbidden(
                "Folder belongs to another account".into(),
            ));
        }
    }

    let collection = store
        .create_collection(CreateCollection {
            user_id: auth.user_id,
            name: request.name,
            description: request.description,
            category: request.category,
            template: request.template,
            custom_field_definitions: request.custom_field_definitions,
            cover_image: request.cover_image,
            cover_image_fit: request.cover_image_fit,
            tags: request.tags,
            folder_id: request.folder_id,
            source_recommended_id: None,
            source_community_id: None,
        })
        .await?;

    check_achievements(store, auth.user_id).await;

    tracing::info!(
        collection_id = collection.id,
        user_id = auth.user_id,
        "collection created"
    );
    Ok(collection)
}

/// Fetch one of the caller's collections with its items.
pub async fn get_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
) -> Result<CollectionWithItems, CoreError> {
    let auth = AuthContext::require(auth)?;
    let collection = owned_collection(store, auth, collection_id).await?;
    let items = store.list_items_for_collection(collection.id).await?;
    Ok(CollectionWithItems { collection, items })
}

/// Cache key for one page of a user's collection list.
pub fn collections_cache_key(user_id: DbId, limit: i64, offset: i64) -> String {
    format!("collections:user:{user_id}:{limit}:{offset}")
}

/// List the caller's collections, newest first, through the
/// request-deduplication cache.
///
/// Concurrent identical list requests inside the cache's staleness window
/// share one store read. The cache is advisory: bypassing it yields the
/// same rows.
pub async fn list_collections<S>(
    store: &Arc<S>,
    cache: &RequestCache<Vec<Collection>>,
    auth: Option<&AuthContext>,
    params: ListCollectionsParams,
) -> Result<Vec<Collection>, CoreError>
where
    S: Store + ?Sized + 'static,
{
    let auth = AuthContext::require(auth)?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let key = collections_cache_key(auth.user_id, limit, offset);
    let fetch_store = Arc::clone(store);
    let user_id = auth.user_id;
    cache
        .get_or_fetch(&key, async move {
            fetch_store
                .list_collections_for_user(user_id, limit, offset)
                .await
                .map_err(CoreError::from)
        })
        .await
}

/// Update a collection's descriptive fields.
pub async fn update_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
    update: UpdateCollection,
) -> Result<Collection, CoreError> {
    let auth = AuthContext::require(auth)?;
    owned_collection(store, auth, collection_id).await?;

    if let Some(ref name) = update.name {
        validate_name(name)?;
    }
    if let Some(ref tags) = update.tags {
        validate_tags(tags)?;
    }

    store
        .update_collection(collection_id, update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        })
}

/// File a collection into one of the caller's folders, or unfile it.
pub async fn move_collection_to_folder<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
    folder_id: Option<DbId>,
) -> Result<Collection, CoreError> {
    let auth = AuthContext::require(auth)?;
    owned_collection(store, auth, collection_id).await?;

    if let Some(folder_id) = folder_id {
        let folder = store
            .find_folder(folder_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Folder",
                id: folder_id,
            })?;
        if folder.user_id != auth.user_id {
            return Err(CoreError::Forbidden(
                "Folder belongs to another account".into(),
            ));
        }
    }

    store
        .move_collection_to_folder(collection_id, folder_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        })
}

/// Delete a collection and its items.
///
/// A live community fork is deliberately left in place: the community copy
/// is independently owned and only `unshare` removes it.
pub async fn delete_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
) -> Result<(), CoreError> {
    let auth = AuthContext::require(auth)?;
    let collection = owned_collection(store, auth, collection_id).await?;

    if let Some(community_id) = collection.shared_to_community_id {
        tracing::warn!(
            collection_id,
            community_id,
            "deleting a shared collection; community fork is now orphaned"
        );
    }

    store.delete_collection_cascade(collection_id).await?;
    check_achievements(store, auth.user_id).await;

    tracing::info!(collection_id, user_id = auth.user_id, "collection deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Item operations
// ---------------------------------------------------------------------------

/// Add an item to one of the caller's collections.
pub async fn create_item<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
    input: CreateItem,
) -> Result<Item, CoreError> {
    let auth = AuthContext::require(auth)?;
    let collection = owned_collection(store, auth, collection_id).await?;

    validate_name(&input.name)?;
    if let Some(ref values) = input.custom_fields {
        custom_fields::validate_values(collection.custom_field_definitions.as_deref(), values)
            .map_err(CoreError::Validation)?;
    }

    let item = store.create_item(collection_id, input).await?;
    check_achievements(store, auth.user_id).await;
    Ok(item)
}

/// Update an item in one of the caller's collections.
pub async fn update_item<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    item_id: DbId,
    update: UpdateItem,
) -> Result<Item, CoreError> {
    let auth = AuthContext::require(auth)?;
    let (item, collection) = owned_item(store, auth, item_id).await?;

    if let Some(ref name) = update.name {
        validate_name(name)?;
    }
    if let Some(ref values) = update.custom_fields {
        custom_fields::validate_values(collection.custom_field_definitions.as_deref(), values)
            .map_err(CoreError::Validation)?;
    }

    let updated = store
        .update_item(item.id, update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    check_achievements(store, auth.user_id).await;
    Ok(updated)
}

/// Mark an item owned or not owned.
pub async fn set_item_owned<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    item_id: DbId,
    is_owned: bool,
) -> Result<Item, CoreError> {
    let update = UpdateItem {
        is_owned: Some(is_owned),
        ..UpdateItem::default()
    };
    update_item(store, auth, item_id, update).await
}

/// Delete an item from one of the caller's collections.
pub async fn delete_item<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    item_id: DbId,
) -> Result<(), CoreError> {
    let auth = AuthContext::require(auth)?;
    let (item, _) = owned_item(store, auth, item_id).await?;

    store.delete_item(item.id).await?;
    check_achievements(store, auth.user_id).await;
    Ok(())
}

/// Bulk-import items into a collection, skipping duplicates.
///
/// A duplicate is an existing item with the same `(name, number)` pair.
/// The whole batch is validated before anything is written and inserted in
/// one atomic write.
pub async fn import_items<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
    items: Vec<CreateItem>,
) -> Result<ImportItemsReport, CoreError> {
    let auth = AuthContext::require(auth)?;
    let collection = owned_collection(store, auth, collection_id).await?;

    if items.is_empty() {
        return Err(CoreError::Validation("Items must not be empty".into()));
    }
    if items.len() > MAX_IMPORT_ITEMS {
        return Err(CoreError::Validation(format!(
            "Too many items: {} (maximum {MAX_IMPORT_ITEMS})",
            items.len()
        )));
    }
    for item in &items {
        validate_name(&item.name)?;
        if let Some(ref values) = item.custom_fields {
            custom_fields::validate_values(collection.custom_field_definitions.as_deref(), values)
                .map_err(CoreError::Validation)?;
        }
    }

    let requested = items.len();
    let created = store
        .create_items_skip_duplicates(collection_id, items)
        .await?;
    check_achievements(store, auth.user_id).await;

    let report = ImportItemsReport {
        requested,
        created: created.len(),
        skipped: requested - created.len(),
    };
    tracing::info!(
        collection_id,
        user_id = auth.user_id,
        created = report.created,
        skipped = report.skipped,
        "items imported"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Public share tokens
// ---------------------------------------------------------------------------

/// Turn on public sharing, minting a fresh token. Re-enabling rotates the
/// token, revoking previously handed-out links.
pub async fn enable_public_share<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
) -> Result<Collection, CoreError> {
    let auth = AuthContext::require(auth)?;
    owned_collection(store, auth, collection_id).await?;

    store
        .set_share_token(collection_id, Some(Uuid::new_v4()))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        })
}

/// Turn off public sharing, revoking the token.
pub async fn disable_public_share<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    collection_id: DbId,
) -> Result<Collection, CoreError> {
    let auth = AuthContext::require(auth)?;
    owned_collection(store, auth, collection_id).await?;

    store
        .set_share_token(collection_id, None)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        })
}

/// Resolve a public share link. No auth: the token is the capability.
///
/// Returns `Ok(None)` when no collection carries the token; the routing
/// layer maps that to its not-found response.
pub async fn get_shared_collection<S: Store + ?Sized>(
    store: &S,
    token: Uuid,
) -> Result<Option<CollectionWithItems>, CoreError> {
    let Some(collection) = store.find_collection_by_share_token(token).await? else {
        return Ok(None);
    };
    let items = store.list_items_for_collection(collection.id).await?;
    Ok(Some(CollectionWithItems { collection, items }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn owned_collection<S: Store + ?Sized>(
    store: &S,
    auth: &AuthContext,
    collection_id: DbId,
) -> Result<Collection, CoreError> {
    let collection = store
        .find_collection(collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        })?;
    if collection.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Collection belongs to another account".into(),
        ));
    }
    Ok(collection)
}

async fn owned_item<S: Store + ?Sized>(
    store: &S,
    auth: &AuthContext,
    item_id: DbId,
) -> Result<(Item, Collection), CoreError> {
    let item = store.find_item(item_id).await?.ok_or(CoreError::NotFound {
        entity: "Item",
        id: item_id,
    })?;
    let collection = owned_collection(store, auth, item.collection_id).await?;
    Ok((item, collection))
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "Too many tags: {} (maximum {MAX_TAGS})",
            tags.len()
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.len() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' exceeds {MAX_TAG_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
