//! Store surface for users.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::store::StoreResult;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning the created row.
    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;

    /// Find a user by id.
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    /// Replace the user's unlocked achievement set in one atomic write.
    ///
    /// Returns `false` if no user with the given id exists.
    async fn set_user_achievements(
        &self,
        id: DbId,
        achievements: Vec<String>,
    ) -> StoreResult<bool>;

    /// Set the verified flag. Returns the updated row, `None` if missing.
    async fn set_user_verified(&self, id: DbId, verified: bool) -> StoreResult<Option<User>>;

    /// Set or clear the display badge. Returns the updated row.
    async fn set_user_badge(&self, id: DbId, badge: Option<String>)
        -> StoreResult<Option<User>>;
}
