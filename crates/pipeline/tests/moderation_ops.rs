//! Integration tests for content reports and account verification.

use assert_matches::assert_matches;
use curio_core::error::CoreError;
use curio_db::models::collection::CoverImageFit;
use curio_db::models::user::CreateUser;
use curio_db::store::{MemoryStore, UserStore};
use curio_pipeline::collections::{create_collection, CreateCollectionRequest};
use curio_pipeline::community::{share, ShareRequest};
use curio_pipeline::context::AuthContext;
use curio_pipeline::admin::set_user_badge;
use curio_pipeline::moderation::{
    issue_verification_token, list_blog_posts, list_open_reports, publish_blog_post,
    report_community_collection, resolve_report, verify_account, PublishPostRequest,
    ReportRequest,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(store: &MemoryStore, name: &str, is_admin: bool) -> AuthContext {
    let user = store
        .create_user(CreateUser {
            username: name.to_string(),
            is_admin,
            is_private: false,
        })
        .await
        .unwrap();
    AuthContext {
        user_id: user.id,
        is_admin,
    }
}

fn collection_request(name: &str) -> CreateCollectionRequest {
    CreateCollectionRequest {
        name: name.to_string(),
        description: None,
        category: None,
        template: None,
        custom_field_definitions: None,
        cover_image: None,
        cover_image_fit: CoverImageFit::Cover,
        tags: Vec::new(),
        folder_id: None,
    }
}

// ---------------------------------------------------------------------------
// Content reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_and_resolution_flow() {
    let store = MemoryStore::new();
    let admin = new_user(&store, "admin", true).await;
    let alice = new_user(&store, "alice", false).await;
    let bob = new_user(&store, "bob", false).await;

    let collection = create_collection(&store, Some(&alice), collection_request("Comics"))
        .await
        .unwrap();
    let fork = share(
        &store,
        Some(&alice),
        ShareRequest {
            collection_id: collection.id,
        },
    )
    .await
    .unwrap();

    let report = report_community_collection(
        &store,
        Some(&bob),
        ReportRequest {
            community_collection_id: fork.collection.id,
            reason: "stolen artwork".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(!report.resolved);

    // Listing is for admins only.
    assert_matches!(
        list_open_reports(&store, Some(&bob)).await,
        Err(CoreError::Forbidden(_))
    );
    let open = list_open_reports(&store, Some(&admin)).await.unwrap();
    assert_eq!(open.len(), 1);

    resolve_report(&store, Some(&admin), report.id).await.unwrap();
    assert!(list_open_reports(&store, Some(&admin))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn report_against_missing_community_collection_is_not_found() {
    let store = MemoryStore::new();
    let bob = new_user(&store, "bob", false).await;

    assert_matches!(
        report_community_collection(
            &store,
            Some(&bob),
            ReportRequest {
                community_collection_id: 404,
                reason: "spam".to_string(),
            },
        )
        .await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Blog and badges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blog_publishing_is_admin_only_and_reading_is_public() {
    let store = MemoryStore::new();
    let admin = new_user(&store, "admin", true).await;
    let bob = new_user(&store, "bob", false).await;

    assert_matches!(
        publish_blog_post(
            &store,
            Some(&bob),
            PublishPostRequest {
                title: "Hello".to_string(),
                body: "world".to_string(),
            },
        )
        .await,
        Err(CoreError::Forbidden(_))
    );

    publish_blog_post(
        &store,
        Some(&admin),
        PublishPostRequest {
            title: "Launch notes".to_string(),
            body: "We shipped folders.".to_string(),
        },
    )
    .await
    .unwrap();

    let posts = list_blog_posts(&store, None, None).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Launch notes");
}

#[tokio::test]
async fn badges_are_set_and_cleared_by_admins() {
    let store = MemoryStore::new();
    let admin = new_user(&store, "admin", true).await;
    let bob = new_user(&store, "bob", false).await;

    let badged = set_user_badge(
        &store,
        Some(&admin),
        bob.user_id,
        Some("Founder".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(badged.badge.as_deref(), Some("Founder"));

    let cleared = set_user_badge(&store, Some(&admin), bob.user_id, None)
        .await
        .unwrap();
    assert_eq!(cleared.badge, None);

    assert_matches!(
        set_user_badge(&store, Some(&bob), bob.user_id, Some("Hacker".to_string())).await,
        Err(CoreError::Forbidden(_))
    );
}

// ---------------------------------------------------------------------------
// Account verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verification_tokens_are_single_use() {
    let store = MemoryStore::new();
    let admin = new_user(&store, "admin", true).await;
    let bob = new_user(&store, "bob", false).await;

    let token = issue_verification_token(&store, Some(&admin), bob.user_id)
        .await
        .unwrap();

    let verified = verify_account(&store, token.token).await.unwrap();
    assert!(verified.is_verified);
    assert_eq!(verified.id, bob.user_id);

    assert_matches!(
        verify_account(&store, token.token).await,
        Err(CoreError::Validation(_))
    );
}
