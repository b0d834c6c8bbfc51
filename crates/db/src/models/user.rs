//! User entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Full user row.
///
/// Credentials live with the external session provider; this row carries
/// only the profile and moderation state the platform itself owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub is_admin: bool,
    pub is_verified: bool,
    pub is_private: bool,
    /// Optional display tag shown next to the username.
    pub badge: Option<String>,
    /// Unlocked achievement ids. Unique, append-only: ids are never
    /// removed once present.
    pub achievements: Vec<String>,
    pub created_at: Timestamp,
}

/// Compact author representation attached to shared collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: DbId,
    pub username: String,
    pub badge: Option<String>,
    pub is_verified: bool,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            badge: user.badge.clone(),
            is_verified: user.is_verified,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_private: bool,
}
