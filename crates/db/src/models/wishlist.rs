//! Wishlist entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// One entry on a user's wishlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a wishlist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWishlistEntry {
    pub user_id: DbId,
    pub name: String,
    pub notes: Option<String>,
}
