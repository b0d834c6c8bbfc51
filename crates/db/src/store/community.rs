//! Store surface for community collections.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::community::{
    CommunityCollection, CommunityItem, CreateCommunityCollection, CreateCommunityItem,
};
use crate::store::StoreResult;

#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Insert a community collection and its items in one atomic write.
    ///
    /// A community collection must never be observable with a partial item
    /// set.
    async fn create_community_collection_with_items(
        &self,
        input: CreateCommunityCollection,
        items: Vec<CreateCommunityItem>,
    ) -> StoreResult<(CommunityCollection, Vec<CommunityItem>)>;

    /// Find a community collection by id.
    async fn find_community_collection(
        &self,
        id: DbId,
    ) -> StoreResult<Option<CommunityCollection>>;

    /// Browse community collections, newest first.
    async fn list_community_collections(
        &self,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CommunityCollection>>;

    /// Items of a community collection ordered by `(number, name)`.
    async fn list_community_items(
        &self,
        community_collection_id: DbId,
    ) -> StoreResult<Vec<CommunityItem>>;

    /// Delete a community collection and all its items in one atomic
    /// write. Returns `true` if a row was deleted.
    async fn delete_community_collection_cascade(&self, id: DbId) -> StoreResult<bool>;

    /// Number of community collections the user has shared.
    async fn count_community_collections_for_user(&self, user_id: DbId) -> StoreResult<u64>;
}
