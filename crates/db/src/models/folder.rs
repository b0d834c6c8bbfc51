//! Folder entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Full folder row. Folders form a per-user tree; collections reference a
/// folder weakly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolder {
    pub user_id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
}
