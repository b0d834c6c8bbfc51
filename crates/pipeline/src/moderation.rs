//! Content reports, account verification, and the blog surface.

use chrono::{Duration, Utc};
use curio_core::error::CoreError;
use curio_core::listing::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use curio_core::types::DbId;
use curio_db::models::moderation::{
    BlogPost, ContentReport, CreateBlogPost, CreateContentReport, CreateVerificationToken,
    VerificationToken,
};
use curio_db::models::user::User;
use curio_db::store::Store;
use serde::Deserialize;
use uuid::Uuid;

use crate::context::AuthContext;

/// Lifetime of an account-verification token.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 48;

/// Maximum length of a content-report reason.
pub const MAX_REPORT_REASON_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Content reports
// ---------------------------------------------------------------------------

/// Request body for reporting a community collection.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub community_collection_id: DbId,
    pub reason: String,
}

/// File a report against a community collection.
pub async fn report_community_collection<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: ReportRequest,
) -> Result<ContentReport, CoreError> {
    let auth = AuthContext::require(auth)?;

    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(CoreError::Validation("Report reason must not be empty".into()));
    }
    if reason.len() > MAX_REPORT_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Report reason exceeds {MAX_REPORT_REASON_LENGTH} characters"
        )));
    }

    store
        .find_community_collection(request.community_collection_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CommunityCollection",
            id: request.community_collection_id,
        })?;

    let report = store
        .create_content_report(CreateContentReport {
            reporter_id: auth.user_id,
            community_collection_id: request.community_collection_id,
            reason: reason.to_string(),
        })
        .await?;

    tracing::info!(
        report_id = report.id,
        community_id = request.community_collection_id,
        reporter_id = auth.user_id,
        "content report filed"
    );
    Ok(report)
}

/// List unresolved reports, oldest first. Admin only.
pub async fn list_open_reports<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
) -> Result<Vec<ContentReport>, CoreError> {
    AuthContext::require_admin(auth)?;
    Ok(store.list_open_content_reports().await?)
}

/// Mark a report resolved. Admin only.
pub async fn resolve_report<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    report_id: DbId,
) -> Result<ContentReport, CoreError> {
    AuthContext::require_admin(auth)?;

    store
        .resolve_content_report(report_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ContentReport",
            id: report_id,
        })
}

// ---------------------------------------------------------------------------
// Account verification
// ---------------------------------------------------------------------------

/// Issue a fresh verification token for a user. Admin only; delivery is
/// the mail layer's concern.
pub async fn issue_verification_token<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    user_id: DbId,
) -> Result<VerificationToken, CoreError> {
    AuthContext::require_admin(auth)?;

    store
        .find_user(user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    Ok(store
        .create_verification_token(CreateVerificationToken {
            user_id,
            token: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
        })
        .await?)
}

/// Redeem a verification token, marking its user verified.
///
/// Tokens are single-use and expire; a second redemption or an expired
/// token fails validation without disclosing which.
pub async fn verify_account<S: Store + ?Sized>(
    store: &S,
    token: Uuid,
) -> Result<User, CoreError> {
    let consumed = store
        .consume_verification_token(token, Utc::now())
        .await?
        .ok_or_else(|| {
            CoreError::Validation("Invalid or expired verification token".into())
        })?;

    let user = store
        .set_user_verified(consumed.user_id, true)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: consumed.user_id,
        })?;

    tracing::info!(user_id = user.id, "account verified");
    Ok(user)
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

/// Request body for publishing a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishPostRequest {
    pub title: String,
    pub body: String,
}

/// Publish a blog post. Admin only.
pub async fn publish_blog_post<S: Store + ?Sized>(
    store: &S,
    auth: Option<&AuthContext>,
    request: PublishPostRequest,
) -> Result<BlogPost, CoreError> {
    let auth = AuthContext::require_admin(auth)?;

    if request.title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if request.body.trim().is_empty() {
        return Err(CoreError::Validation("Body must not be empty".into()));
    }

    Ok(store
        .create_blog_post(CreateBlogPost {
            author_id: auth.user_id,
            title: request.title,
            body: request.body,
        })
        .await?)
}

/// List published posts, newest first. Public.
pub async fn list_blog_posts<S: Store + ?Sized>(
    store: &S,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<BlogPost>, CoreError> {
    let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);
    Ok(store.list_blog_posts(limit, offset).await?)
}
