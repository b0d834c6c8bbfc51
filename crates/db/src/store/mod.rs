//! The data-store interface.
//!
//! One trait per entity family, mirroring how the platform's repositories
//! are organized, combined into the [`Store`] supertrait operations take
//! as `&S where S: Store + ?Sized`. Absence is expressed as `Ok(None)` /
//! `Ok(false)`, never as an error; [`StoreError`] covers backend failures
//! and constraint violations only.
//!
//! Atomicity contract: every method documented as atomic must make its
//! whole effect visible at once — a community collection observable with a
//! partial item set is a backend bug, not an acceptable race.

mod collections;
mod community;
mod folders;
mod items;
mod memory;
mod moderation;
mod recommended;
mod users;
mod wishlist;

pub use collections::CollectionStore;
pub use community::CommunityStore;
pub use folders::FolderStore;
pub use items::ItemStore;
pub use memory::MemoryStore;
pub use moderation::ModerationStore;
pub use recommended::RecommendedStore;
pub use users::UserStore;
pub use wishlist::WishlistStore;

use curio_core::error::CoreError;

/// Error at the storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A constraint the backend enforces was violated.
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// The backend itself failed (connection, I/O, corruption).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => CoreError::Conflict(msg),
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// Convenience alias for store method results.
pub type StoreResult<T> = Result<T, StoreError>;

/// The full data-store surface consumed by `curio-pipeline`.
pub trait Store:
    UserStore
    + CollectionStore
    + ItemStore
    + CommunityStore
    + RecommendedStore
    + FolderStore
    + WishlistStore
    + ModerationStore
{
}

impl<T> Store for T where
    T: UserStore
        + CollectionStore
        + ItemStore
        + CommunityStore
        + RecommendedStore
        + FolderStore
        + WishlistStore
        + ModerationStore
{
}
