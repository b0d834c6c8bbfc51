//! Integration tests for the admin bulk operations.
//!
//! Bulk cover generation must tolerate per-collection failures and report
//! them structurally; the bulk item-image batch must be all-or-nothing.

use assert_matches::assert_matches;
use async_trait::async_trait;
use curio_core::custom_fields::CustomFieldDefinition;
use curio_core::error::CoreError;
use curio_db::models::collection::{CoverImageFit, CreateCollection};
use curio_db::models::item::{CreateItem, ItemImageUpdate};
use curio_db::models::recommended::{CreateRecommendedCollection, CreateRecommendedItem};
use curio_db::models::user::CreateUser;
use curio_db::store::{CollectionStore, ItemStore, MemoryStore, UserStore};
use curio_db::models::recommended::UpdateRecommendedCollection;
use curio_pipeline::admin::{
    bulk_generate_covers, bulk_update_item_images, create_recommended_collection,
    delete_recommended_collection, set_user_verified, update_recommended_collection,
    BulkItemImageRequest, CoverError, CoverGenerator, CreateRecommendedRequest,
};
use curio_pipeline::community::browse_recommended;
use curio_pipeline::config::PipelineConfig;
use curio_pipeline::context::AuthContext;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_admin(store: &MemoryStore) -> AuthContext {
    let user = store
        .create_user(CreateUser {
            username: "admin".to_string(),
            is_admin: true,
            is_private: false,
        })
        .await
        .unwrap();
    AuthContext {
        user_id: user.id,
        is_admin: true,
    }
}

async fn new_member(store: &MemoryStore, name: &str) -> AuthContext {
    let user = store
        .create_user(CreateUser {
            username: name.to_string(),
            is_admin: false,
            is_private: false,
        })
        .await
        .unwrap();
    AuthContext {
        user_id: user.id,
        is_admin: false,
    }
}

fn coverless_collection(user_id: i64, name: &str) -> CreateCollection {
    CreateCollection {
        user_id,
        name: name.to_string(),
        description: None,
        category: Some("comics".to_string()),
        template: None,
        custom_field_definitions: None,
        cover_image: None,
        cover_image_fit: CoverImageFit::Cover,
        tags: Vec::new(),
        folder_id: None,
        source_recommended_id: None,
        source_community_id: None,
    }
}

fn new_item(name: &str, number: i32) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        number: Some(number),
        notes: None,
        image: None,
        is_owned: false,
        custom_fields: None,
    }
}

/// Renders a deterministic cover, failing for one specific collection.
struct FlakyGenerator {
    fail_for: &'static str,
}

#[async_trait]
impl CoverGenerator for FlakyGenerator {
    async fn generate(&self, name: &str, _category: Option<&str>) -> Result<String, CoverError> {
        if name == self.fail_for {
            return Err(CoverError::Render("renderer out of memory".to_string()));
        }
        Ok(format!("covers/{name}.png"))
    }
}

/// Never finishes inside any reasonable budget.
struct SlowGenerator;

#[async_trait]
impl CoverGenerator for SlowGenerator {
    async fn generate(&self, name: &str, _category: Option<&str>) -> Result<String, CoverError> {
        tokio::time::sleep(std::time::Duration::from_secs(3_600)).await;
        Ok(format!("covers/{name}.png"))
    }
}

// ---------------------------------------------------------------------------
// Bulk cover generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_cover_generation_tolerates_partial_failure() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    for name in ["One", "Two", "Broken", "Four", "Five"] {
        store
            .create_collection(coverless_collection(admin.user_id, name))
            .await
            .unwrap();
    }

    let generator = FlakyGenerator { fail_for: "Broken" };
    let report = bulk_generate_covers(&store, Some(&admin), &generator, &PipelineConfig::default())
        .await
        .unwrap();

    assert_eq!(report.scanned, 5);
    assert_eq!(report.generated, 4);
    assert_eq!(report.updated, 4);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].collection, "Broken");

    // Only the failed collection is still missing a cover.
    let still_missing = store.list_collections_missing_covers().await.unwrap();
    assert_eq!(still_missing.len(), 1);
    assert_eq!(still_missing[0].name, "Broken");
}

#[tokio::test(start_paused = true)]
async fn bulk_cover_generation_times_out_hung_renders() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    store
        .create_collection(coverless_collection(admin.user_id, "Stuck"))
        .await
        .unwrap();

    let report = bulk_generate_covers(&store, Some(&admin), &SlowGenerator, &PipelineConfig::default())
        .await
        .unwrap();

    assert_eq!(report.generated, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].message.contains("timed out"));
}

#[tokio::test]
async fn bulk_cover_generation_is_admin_only() {
    let store = MemoryStore::new();
    let member = new_member(&store, "mallory").await;
    let generator = FlakyGenerator { fail_for: "" };

    assert_matches!(
        bulk_generate_covers(&store, Some(&member), &generator, &PipelineConfig::default()).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        bulk_generate_covers(&store, None, &generator, &PipelineConfig::default()).await,
        Err(CoreError::Unauthorized(_))
    );
}

// ---------------------------------------------------------------------------
// Bulk item-image assignment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_item_images_rejects_foreign_id_with_zero_writes() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    let target = store
        .create_collection(coverless_collection(admin.user_id, "Target"))
        .await
        .unwrap();
    let other = store
        .create_collection(coverless_collection(admin.user_id, "Other"))
        .await
        .unwrap();
    let ours = store.create_item(target.id, new_item("Ours", 1)).await.unwrap();
    let foreign = store
        .create_item(other.id, new_item("Foreign", 1))
        .await
        .unwrap();

    let request = BulkItemImageRequest {
        collection_id: target.id,
        updates: vec![
            ItemImageUpdate {
                item_id: ours.id,
                image: "items/ours.png".to_string(),
            },
            ItemImageUpdate {
                item_id: foreign.id,
                image: "items/foreign.png".to_string(),
            },
        ],
    };
    assert_matches!(
        bulk_update_item_images(&store, Some(&admin), request).await,
        Err(CoreError::Validation(_))
    );

    // Zero items updated, including the valid half of the batch.
    let untouched = store.find_item(ours.id).await.unwrap().unwrap();
    assert_eq!(untouched.image, None);
}

#[tokio::test]
async fn bulk_item_images_applies_whole_batch() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    let target = store
        .create_collection(coverless_collection(admin.user_id, "Target"))
        .await
        .unwrap();
    let first = store.create_item(target.id, new_item("First", 1)).await.unwrap();
    let second = store
        .create_item(target.id, new_item("Second", 2))
        .await
        .unwrap();

    let response = bulk_update_item_images(
        &store,
        Some(&admin),
        BulkItemImageRequest {
            collection_id: target.id,
            updates: vec![
                ItemImageUpdate {
                    item_id: first.id,
                    image: "items/1.png".to_string(),
                },
                ItemImageUpdate {
                    item_id: second.id,
                    image: "items/2.png".to_string(),
                },
            ],
        },
    )
    .await
    .unwrap();

    assert_eq!(response.updated, 2);
    assert_eq!(response.items[0].image.as_deref(), Some("items/1.png"));
    assert_eq!(response.items[1].image.as_deref(), Some("items/2.png"));
}

#[tokio::test]
async fn bulk_item_images_rejects_empty_batch() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    let target = store
        .create_collection(coverless_collection(admin.user_id, "Target"))
        .await
        .unwrap();

    assert_matches!(
        bulk_update_item_images(
            &store,
            Some(&admin),
            BulkItemImageRequest {
                collection_id: target.id,
                updates: Vec::new(),
            },
        )
        .await,
        Err(CoreError::Validation(_))
    );
}

// ---------------------------------------------------------------------------
// Recommended catalog curation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recommended_curation_validates_item_fields_against_schema() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;

    let mut bad_fields = serde_json::Map::new();
    bad_fields.insert("condition".to_string(), json!("mint"));

    let request = CreateRecommendedRequest {
        collection: CreateRecommendedCollection {
            name: "Starter".to_string(),
            description: None,
            category: None,
            template: None,
            custom_field_definitions: Some(vec![CustomFieldDefinition {
                name: "grade".to_string(),
            }]),
            cover_image: None,
            cover_image_fit: CoverImageFit::Cover,
            tags: Vec::new(),
        },
        items: vec![CreateRecommendedItem {
            name: "Card".to_string(),
            number: Some(1),
            notes: None,
            image: None,
            custom_fields: Some(bad_fields),
        }],
    };
    assert_matches!(
        create_recommended_collection(&store, Some(&admin), request).await,
        Err(CoreError::Validation(_))
    );
}

#[tokio::test]
async fn recommended_curation_lifecycle() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;

    let request = CreateRecommendedRequest {
        collection: CreateRecommendedCollection {
            name: "Silver Age".to_string(),
            description: None,
            category: Some("comics".to_string()),
            template: None,
            custom_field_definitions: None,
            cover_image: None,
            cover_image_fit: CoverImageFit::Cover,
            tags: Vec::new(),
        },
        items: vec![CreateRecommendedItem {
            name: "Action Comics".to_string(),
            number: Some(252),
            notes: None,
            image: None,
            custom_fields: None,
        }],
    };
    let (created, items) = create_recommended_collection(&store, Some(&admin), request)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);

    // The catalog is publicly browsable.
    let catalog = browse_recommended(&store, None, None).await.unwrap();
    assert_eq!(catalog.len(), 1);

    let updated = update_recommended_collection(
        &store,
        Some(&admin),
        created.id,
        UpdateRecommendedCollection {
            description: Some("staff picks".to_string()),
            ..UpdateRecommendedCollection::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.description.as_deref(), Some("staff picks"));

    delete_recommended_collection(&store, Some(&admin), created.id)
        .await
        .unwrap();
    assert!(browse_recommended(&store, None, None)
        .await
        .unwrap()
        .is_empty());
    assert_matches!(
        delete_recommended_collection(&store, Some(&admin), created.id).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn recommended_curation_is_admin_only() {
    let store = MemoryStore::new();
    let member = new_member(&store, "mallory").await;

    let request = CreateRecommendedRequest {
        collection: CreateRecommendedCollection {
            name: "Starter".to_string(),
            description: None,
            category: None,
            template: None,
            custom_field_definitions: None,
            cover_image: None,
            cover_image_fit: CoverImageFit::Cover,
            tags: Vec::new(),
        },
        items: Vec::new(),
    };
    assert_matches!(
        create_recommended_collection(&store, Some(&member), request).await,
        Err(CoreError::Forbidden(_))
    );
}

// ---------------------------------------------------------------------------
// User moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verifying_a_user_sets_the_flag() {
    let store = MemoryStore::new();
    let admin = new_admin(&store).await;
    let member = new_member(&store, "bob").await;

    let user = set_user_verified(&store, Some(&admin), member.user_id, true)
        .await
        .unwrap();
    assert!(user.is_verified);

    assert_matches!(
        set_user_verified(&store, Some(&admin), 9_999, true).await,
        Err(CoreError::NotFound { .. })
    );
}
