//! Store surface for items.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::item::{CollectionItemCounts, CreateItem, Item, ItemImageUpdate, UpdateItem};
use crate::store::StoreResult;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item into a collection, returning the created row.
    async fn create_item(&self, collection_id: DbId, input: CreateItem) -> StoreResult<Item>;

    /// Insert many items in one atomic write, skipping any whose
    /// `(name, number)` pair already exists in the collection.
    ///
    /// Returns only the items actually created.
    async fn create_items_skip_duplicates(
        &self,
        collection_id: DbId,
        items: Vec<CreateItem>,
    ) -> StoreResult<Vec<Item>>;

    /// Find an item by id.
    async fn find_item(&self, id: DbId) -> StoreResult<Option<Item>>;

    /// Items of a collection ordered by `(number, name)`; numberless items
    /// sort after numbered ones.
    async fn list_items_for_collection(&self, collection_id: DbId) -> StoreResult<Vec<Item>>;

    /// Update an item. Only `Some` fields in `input` are applied.
    async fn update_item(&self, id: DbId, input: UpdateItem) -> StoreResult<Option<Item>>;

    /// Delete an item. Returns `true` if a row was deleted.
    async fn delete_item(&self, id: DbId) -> StoreResult<bool>;

    /// Apply a batch of image assignments in one atomic write.
    ///
    /// Every item must exist and belong to `collection_id`; otherwise the
    /// whole batch fails with [`crate::store::StoreError::Conflict`] and
    /// nothing is written. Returns the updated rows in batch order.
    async fn update_item_images(
        &self,
        collection_id: DbId,
        updates: &[ItemImageUpdate],
    ) -> StoreResult<Vec<Item>>;

    /// Item/owned tallies per collection across one user's collections.
    async fn item_counts_by_collection(
        &self,
        user_id: DbId,
    ) -> StoreResult<Vec<CollectionItemCounts>>;
}
