//! Store surface for folders.

use async_trait::async_trait;
use curio_core::types::DbId;

use crate::models::folder::{CreateFolder, Folder};
use crate::store::StoreResult;

#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Insert a new folder, returning the created row.
    async fn create_folder(&self, input: CreateFolder) -> StoreResult<Folder>;

    /// Find a folder by id.
    async fn find_folder(&self, id: DbId) -> StoreResult<Option<Folder>>;

    /// List a user's folders ordered by name.
    async fn list_folders_for_user(&self, user_id: DbId) -> StoreResult<Vec<Folder>>;

    /// Direct children of a folder.
    async fn list_child_folders(&self, parent_id: DbId) -> StoreResult<Vec<Folder>>;

    /// Re-parent a folder (or make it a root with `None`).
    async fn set_folder_parent(
        &self,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> StoreResult<Option<Folder>>;

    /// Delete a folder row. Collections and child folders are the caller's
    /// responsibility (see the pipeline's folder deletion).
    async fn delete_folder(&self, id: DbId) -> StoreResult<bool>;

    /// Number of folders the user owns.
    async fn count_folders_for_user(&self, user_id: DbId) -> StoreResult<u64>;
}
