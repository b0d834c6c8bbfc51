use crate::types::DbId;

/// Domain error taxonomy shared by every operation in the workspace.
///
/// `Clone` is required so results carrying a `CoreError` can be fanned out
/// to every waiter of a deduplicated request (see [`crate::cache`]).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
