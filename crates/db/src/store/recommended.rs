//! Store surface for the recommended (admin-curated) catalog.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::recommended::{
    CreateRecommendedCollection, CreateRecommendedItem, RecommendedCollection, RecommendedItem,
    UpdateRecommendedCollection,
};
use crate::store::StoreResult;

#[async_trait]
pub trait RecommendedStore: Send + Sync {
    /// Insert a recommended collection and its items in one atomic write.
    async fn create_recommended_collection_with_items(
        &self,
        input: CreateRecommendedCollection,
        items: Vec<CreateRecommendedItem>,
    ) -> StoreResult<(RecommendedCollection, Vec<RecommendedItem>)>;

    /// Find a recommended collection by id.
    async fn find_recommended_collection(
        &self,
        id: DbId,
    ) -> StoreResult<Option<RecommendedCollection>>;

    /// Browse the recommended catalog, newest first.
    async fn list_recommended_collections(
        &self,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<RecommendedCollection>>;

    /// Items of a recommended collection ordered by `(number, name)`.
    async fn list_recommended_items(
        &self,
        recommended_collection_id: DbId,
    ) -> StoreResult<Vec<RecommendedItem>>;

    /// Update a recommended collection. Only `Some` fields are applied.
    async fn update_recommended_collection(
        &self,
        id: DbId,
        input: UpdateRecommendedCollection,
    ) -> StoreResult<Option<RecommendedCollection>>;

    /// Delete a recommended collection and its items in one atomic write.
    async fn delete_recommended_collection_cascade(&self, id: DbId) -> StoreResult<bool>;
}
