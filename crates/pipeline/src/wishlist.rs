//! Wishlist maintenance.

use curio_core::error::CoreError;
use curio_core::types::DbId;
use curio_db::models::wishlist::{CreateWishlistEntry, WishlistEntry};
use curio_db::store::Store;
use serde::Deserialize;

use crate::achievements::check_achievements;
use crate::context::AuthContext;

/// Maximum length for a wishlist entry name.
pub const MAX_WISHLIST_NAME_LENGTH: usize = 120;

/// Request body for adding a wishlist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AddWishlistEntryRequest {
    pub name: String,
    pub notes: Option<String>,
}

/// Add an entry to the caller's wishlist.
pub async fn add_wishlist_entry<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: AddWishlistEntryRequest,
) -> Result<WishlistEntry, CoreError> {
    let auth = AuthContext::require(auth)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Wishlist entry name must not be empty".into(),
        ));
    }
    if name.len() > MAX_WISHLIST_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Wishlist entry name exceeds {MAX_WISHLIST_NAME_LENGTH} characters"
        )));
    }

    let entry = store
        .create_wishlist_entry(CreateWishlistEntry {
            user_id: auth.user_id,
            name: name.to_string(),
            notes: request.notes,
        })
        .await?;

    check_achievements(store, auth.user_id).await;
    Ok(entry)
}

/// List the caller's wishlist, newest first.
pub async fn list_wishlist<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
) -> Result<Vec<WishlistEntry>, CoreError> {
    let auth = AuthContext::require(auth)?;
    Ok(store.list_wishlist_for_user(auth.user_id).await?)
}

/// Remove an entry from the caller's wishlist.
pub async fn remove_wishlist_entry<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    entry_id: DbId,
) -> Result<(), CoreError> {
    let auth = AuthContext::require(auth)?;

    let entry = store
        .find_wishlist_entry(entry_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "WishlistEntry",
            id: entry_id,
        })?;
    if entry.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Wishlist entry belongs to another account".into(),
        ));
    }

    store.delete_wishlist_entry(entry_id).await?;
    Ok(())
}
