//! Store surface for collections.

use async_trait::async_trait;
use curio_core::types::DbId;
use uuid::Uuid;

use crate::models::collection::{Collection, CreateCollection, UpdateCollection};
use crate::models::item::{CreateItem, Item};
use crate::store::StoreResult;

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Insert a new collection, returning the created row.
    async fn create_collection(&self, input: CreateCollection) -> StoreResult<Collection>;

    /// Insert a collection and its items in one atomic write.
    ///
    /// Used by the clone pipeline so a cloned collection is never visible
    /// with a partial item set.
    async fn create_collection_with_items(
        &self,
        input: CreateCollection,
        items: Vec<CreateItem>,
    ) -> StoreResult<(Collection, Vec<Item>)>;

    /// Find a collection by id.
    async fn find_collection(&self, id: DbId) -> StoreResult<Option<Collection>>;

    /// Find a collection by its public share token.
    async fn find_collection_by_share_token(
        &self,
        token: Uuid,
    ) -> StoreResult<Option<Collection>>;

    /// List a user's collections, newest first.
    async fn list_collections_for_user(
        &self,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Collection>>;

    /// Collections whose cover image is missing or empty, across all users.
    async fn list_collections_missing_covers(&self) -> StoreResult<Vec<Collection>>;

    /// Update a collection. Only `Some` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given id exists.
    async fn update_collection(
        &self,
        id: DbId,
        input: UpdateCollection,
    ) -> StoreResult<Option<Collection>>;

    /// Delete a collection and its items in one atomic write.
    ///
    /// Returns `true` if a row was deleted.
    async fn delete_collection_cascade(&self, id: DbId) -> StoreResult<bool>;

    /// Point the collection at its live community fork, or clear the link.
    async fn set_shared_to_community(
        &self,
        id: DbId,
        community_id: Option<DbId>,
    ) -> StoreResult<Option<Collection>>;

    /// Set or clear the public share token.
    async fn set_share_token(
        &self,
        id: DbId,
        token: Option<Uuid>,
    ) -> StoreResult<Option<Collection>>;

    /// Move the collection into a folder, or out of any folder.
    async fn move_collection_to_folder(
        &self,
        id: DbId,
        folder_id: Option<DbId>,
    ) -> StoreResult<Option<Collection>>;

    /// Detach every collection referencing `folder_id`. Returns how many
    /// rows were detached.
    async fn detach_collections_from_folder(&self, folder_id: DbId) -> StoreResult<u64>;

    /// Number of collections the user owns.
    async fn count_collections_for_user(&self, user_id: DbId) -> StoreResult<u64>;
}
