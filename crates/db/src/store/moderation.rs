//! Store surface for blog posts, content reports, and verification tokens.

use async_trait::async_trait;
use curio_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::moderation::{
    BlogPost, ContentReport, CreateBlogPost, CreateContentReport, CreateVerificationToken,
    VerificationToken,
};
use crate::store::StoreResult;

#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Insert a blog post, returning the created row.
    async fn create_blog_post(&self, input: CreateBlogPost) -> StoreResult<BlogPost>;

    /// Published posts, newest first.
    async fn list_blog_posts(&self, limit: i64, offset: i64) -> StoreResult<Vec<BlogPost>>;

    /// File a content report, returning the created row.
    async fn create_content_report(
        &self,
        input: CreateContentReport,
    ) -> StoreResult<ContentReport>;

    /// Reports not yet resolved, oldest first.
    async fn list_open_content_reports(&self) -> StoreResult<Vec<ContentReport>>;

    /// Mark a report resolved. Returns the updated row, `None` if missing.
    async fn resolve_content_report(&self, id: DbId) -> StoreResult<Option<ContentReport>>;

    /// Insert a verification token, returning the created row.
    async fn create_verification_token(
        &self,
        input: CreateVerificationToken,
    ) -> StoreResult<VerificationToken>;

    /// Atomically consume a token: the first call before `now` passes
    /// `expires_at` returns the row and marks it consumed; any later call
    /// returns `None`.
    async fn consume_verification_token(
        &self,
        token: Uuid,
        now: Timestamp,
    ) -> StoreResult<Option<VerificationToken>>;
}
