//! Caller identity resolved by the external session layer.

use curio_core::error::CoreError;
use curio_core::types::DbId;

/// Identity attached to an inbound request.
///
/// The session/credential provider is an external collaborator; by the
/// time an operation runs, it has either resolved the caller to this pair
/// or produced nothing. Operations receive `Option<&AuthContext>` and
/// treat absence as unauthorized before touching the store.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: DbId,
    pub is_admin: bool,
}

impl AuthContext {
    /// Resolve a caller identity, or fail with `Unauthorized`.
    pub fn require(auth: Option<&AuthContext>) -> Result<&AuthContext, CoreError> {
        auth.ok_or_else(|| CoreError::Unauthorized("No authenticated user".into()))
    }

    /// Resolve an admin identity: `Unauthorized` when absent, `Forbidden`
    /// for a non-admin caller.
    pub fn require_admin(auth: Option<&AuthContext>) -> Result<&AuthContext, CoreError> {
        let ctx = Self::require(auth)?;
        if !ctx.is_admin {
            return Err(CoreError::Forbidden(
                "Administrator access required".into(),
            ));
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identity_is_unauthorized() {
        assert!(matches!(
            AuthContext::require(None),
            Err(CoreError::Unauthorized(_))
        ));
    }

    #[test]
    fn non_admin_is_forbidden() {
        let user = AuthContext {
            user_id: 1,
            is_admin: false,
        };
        assert!(matches!(
            AuthContext::require_admin(Some(&user)),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_passes_both_checks() {
        let admin = AuthContext {
            user_id: 1,
            is_admin: true,
        };
        assert!(AuthContext::require(Some(&admin)).is_ok());
        assert!(AuthContext::require_admin(Some(&admin)).is_ok());
    }
}
