//! Store surface for wishlists.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::wishlist::{CreateWishlistEntry, WishlistEntry};
use crate::store::StoreResult;

#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Insert a new wishlist entry, returning the created row.
    async fn create_wishlist_entry(
        &self,
        input: CreateWishlistEntry,
    ) -> StoreResult<WishlistEntry>;

    /// A user's wishlist, newest first.
    async fn list_wishlist_for_user(&self, user_id: DbId) -> StoreResult<Vec<WishlistEntry>>;

    /// Find a wishlist entry by id.
    async fn find_wishlist_entry(&self, id: DbId) -> StoreResult<Option<WishlistEntry>>;

    /// Delete a wishlist entry. Returns `true` if a row was deleted.
    async fn delete_wishlist_entry(&self, id: DbId) -> StoreResult<bool>;

    /// Number of entries on the user's wishlist.
    async fn count_wishlist_entries_for_user(&self, user_id: DbId) -> StoreResult<u64>;
}
