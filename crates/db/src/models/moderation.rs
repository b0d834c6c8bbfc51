//! Blog, content-report, and verification-token models.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub body: String,
    pub published_at: Timestamp,
}

/// DTO for creating a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogPost {
    pub author_id: DbId,
    pub title: String,
    pub body: String,
}

/// A user-filed report against a community collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentReport {
    pub id: DbId,
    pub reporter_id: DbId,
    pub community_collection_id: DbId,
    pub reason: String,
    pub resolved: bool,
    pub created_at: Timestamp,
}

/// DTO for filing a content report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentReport {
    pub reporter_id: DbId,
    pub community_collection_id: DbId,
    pub reason: String,
}

/// A single-use account-verification token consumed by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token: Uuid,
    pub expires_at: Timestamp,
    pub consumed: bool,
}

/// DTO for creating a verification token.
#[derive(Debug, Clone)]
pub struct CreateVerificationToken {
    pub user_id: DbId,
    pub token: Uuid,
    pub expires_at: Timestamp,
}
