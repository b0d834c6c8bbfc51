//! Folder tree maintenance.
//!
//! Folders form a per-user tree. Collections reference their folder
//! weakly: deleting a folder detaches its collections and re-parents its
//! child folders, it never deletes either. Moves that would introduce a
//! cycle are rejected before any write.

use std::collections::HashSet;

use curio_core::error::CoreError;
use curio_core::types::DbId;
use curio_db::models::folder::{CreateFolder, Folder};
use curio_db::store::Store;
use serde::Deserialize;

use crate::achievements::check_achievements;
use crate::context::AuthContext;

/// Maximum length for folder names.
pub const MAX_FOLDER_NAME_LENGTH: usize = 80;

/// Request body for creating a folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// Create a folder owned by the caller, optionally under a parent.
pub async fn create_folder<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: CreateFolderRequest,
) -> Result<Folder, CoreError> {
    let auth = AuthContext::require(auth)?;
    validate_folder_name(&request.name)?;

    if let Some(parent_id) = request.parent_id {
        owned_folder(store, auth, parent_id).await?;
    }

    let folder = store
        .create_folder(CreateFolder {
            user_id: auth.user_id,
            name: request.name,
            parent_id: request.parent_id,
        })
        .await?;

    check_achievements(store, auth.user_id).await;

    tracing::info!(folder_id = folder.id, user_id = auth.user_id, "folder created");
    Ok(folder)
}

/// List the caller's folders ordered by name.
pub async fn list_folders<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
) -> Result<Vec<Folder>, CoreError> {
    let auth = AuthContext::require(auth)?;
    Ok(store.list_folders_for_user(auth.user_id).await?)
}

/// Move a folder under a new parent, or to the root with `None`.
///
/// Rejects self-parenting and any move that would place a folder under
/// its own descendant, before anything is written.
pub async fn move_folder<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    folder_id: DbId,
    new_parent_id: Option<DbId>,
) -> Result<Folder, CoreError> {
    let auth = AuthContext::require(auth)?;
    owned_folder(store, auth, folder_id).await?;

    if let Some(parent_id) = new_parent_id {
        if parent_id == folder_id {
            return Err(CoreError::Validation(
                "A folder cannot be its own parent".into(),
            ));
        }
        let parent = owned_folder(store, auth, parent_id).await?;
        ensure_not_descendant(store, folder_id, &parent).await?;
    }

    store
        .set_folder_parent(folder_id, new_parent_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        })
}

/// Delete a folder.
///
/// Its collections are detached (never deleted) and its child folders are
/// re-parented to the deleted folder's own parent.
pub async fn delete_folder<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    folder_id: DbId,
) -> Result<(), CoreError> {
    let auth = AuthContext::require(auth)?;
    let folder = owned_folder(store, auth, folder_id).await?;

    for child in store.list_child_folders(folder_id).await? {
        store.set_folder_parent(child.id, folder.parent_id).await?;
    }
    let detached = store.detach_collections_from_folder(folder_id).await?;
    store.delete_folder(folder_id).await?;

    tracing::info!(
        folder_id,
        user_id = auth.user_id,
        detached_collections = detached,
        "folder deleted"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn owned_folder<S: Store + ?Sized>(
    store: &S,
    auth: &AuthContext,
    folder_id: DbId,
) -> Result<Folder, CoreError> {
    let folder = store
        .find_folder(folder_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        })?;
    if folder.user_id != auth.user_id {
        return Err(CoreError::Forbidden(
            "Folder belongs to another account".into(),
        ));
    }
    Ok(folder)
}

/// Walk up from `candidate_parent`; finding `folder_id` among its
/// ancestors means the move would create a cycle.
async fn ensure_not_descendant<S: Store + ?Sized>(
    store: &S,
    folder_id: DbId,
    candidate_parent: &Folder,
) -> Result<(), CoreError> {
    let mut visited = HashSet::new();
    let mut cursor = candidate_parent.parent_id;

    while let Some(ancestor_id) = cursor {
        if ancestor_id == folder_id {
            return Err(CoreError::Validation(
                "Cannot move a folder under its own descendant".into(),
            ));
        }
        // Guard against pre-existing corruption; a repeated ancestor would
        // otherwise loop forever.
        if !visited.insert(ancestor_id) {
            return Err(CoreError::Internal(format!(
                "folder tree contains a cycle at folder {ancestor_id}"
            )));
        }
        cursor = match store.find_folder(ancestor_id).await? {
            Some(ancestor) => ancestor.parent_id,
            None => None,
        };
    }
    Ok(())
}

fn validate_folder_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Folder name must not be empty".into()));
    }
    if name.len() > MAX_FOLDER_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Folder name exceeds {MAX_FOLDER_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
