//! Integration tests for achievement evaluation and unlock persistence.
//!
//! Exercises the idempotence and monotonicity guarantees end-to-end: the
//! rule engine is pure, but these tests go through the store-backed
//! aggregation and the atomic unlock write.

use curio_core::achievements::UserStats;
use curio_db::models::item::CreateItem;
use curio_db::models::user::CreateUser;
use curio_db::models::wishlist::CreateWishlistEntry;
use curio_db::store::{
    CollectionStore, FolderStore, ItemStore, MemoryStore, UserStore, WishlistStore,
};
use curio_db::models::collection::{CoverImageFit, CreateCollection};
use curio_db::models::folder::CreateFolder;
use curio_pipeline::achievements::{apply_unlocks, check_achievements, load_user_stats};
use curio_pipeline::community::{share, ShareRequest};
use curio_pipeline::context::AuthContext;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(store: &MemoryStore, name: &str) -> AuthContext {
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

fn new_collection(user_id: i64, name: &str) -> CreateCollection {
    CreateCollection {
        user_id,
        name: name.to_string(),
        description: None,
        category: None,
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

fn owned_item(name: &str, number: i32) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        number: Some(number),
        notes: None,
        image: None,
        is_owned: true,
        custom_fields: None,
    }
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apply_unlocks_is_idempotent() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice").await;
    let collection = store
        .create_collection(new_collection(alice.user_id, "Comics"))
        .await
        .unwrap();
    store
        .create_item(collection.id, owned_item("Issue 1", 1))
        .await
        .unwrap();

    let first = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert!(!first.is_empty());

    let second = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn unlocks_arrive_in_canonical_catalog_order() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice").await;
    let collection = store
        .create_collection(new_collection(alice.user_id, "Comics"))
        .await
        .unwrap();
    for n in 1..=10 {
        store
            .create_item(collection.id, owned_item(&format!("Issue {n}"), n))
            .await
            .unwrap();
    }

    // One collection, ten owned items, fully owned: four rules fire at
    // once and must come back in catalog order, not unlock-trigger order.
    let newly = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert_eq!(
        newly,
        vec![
            "first_item",
            "collector_10",
            "first_collection",
            "completionist"
        ]
    );
}

// ---------------------------------------------------------------------------
// Monotonicity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn achievements_survive_stat_regression() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice").await;
    let collection = store
        .create_collection(new_collection(alice.user_id, "Comics"))
        .await
        .unwrap();
    let item = store
        .create_item(collection.id, owned_item("Issue 1", 1))
        .await
        .unwrap();

    let newly = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert!(newly.contains(&"completionist".to_string()));

    // Regress every statistic that earned the unlocks.
    store.delete_item(item.id).await.unwrap();
    let after = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert!(after.is_empty());

    let user = store.find_user(alice.user_id).await.unwrap().unwrap();
    assert!(user.achievements.contains(&"completionist".to_string()));
    assert!(user.achievements.contains(&"first_item".to_string()));
}

#[tokio::test]
async fn completion_requires_every_item_owned() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice").await;
    let collection = store
        .create_collection(new_collection(alice.user_id, "Comics"))
        .await
        .unwrap();
    store
        .create_item(collection.id, owned_item("Issue 1", 1))
        .await
        .unwrap();
    let missing = store
        .create_item(
            collection.id,
            CreateItem {
                name: "Issue 2".to_string(),
                number: Some(2),
                notes: None,
                image: None,
                is_owned: false,
                custom_fields: None,
            },
        )
        .await
        .unwrap();

    let newly = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert!(!newly.contains(&"completionist".to_string()));

    store
        .update_item(
            missing.id,
            curio_db::models::item::UpdateItem {
                is_owned: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let newly = apply_unlocks(&store, alice.user_id).await.unwrap();
    assert_eq!(newly, vec!["completionist".to_string()]);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_aggregate_across_all_sources() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice").await;

    let full = store
        .create_collection(new_collection(alice.user_id, "Complete"))
        .await
        .unwrap();
    store
        .create_item(full.id, owned_item("One", 1))
        .await
        .unwrap();
    let partial = store
        .create_collection(new_collection(alice.user_id, "Partial"))
        .await
        .unwrap();
    store
        .create_item(partial.id, owned_item("Two", 1))
        .await
        .unwrap();
    store
        .create_item(
            partial.id,
            CreateItem {
                name: "Three".to_string(),
                number: Some(2),
                notes: None,
                image: None,
                is_owned: false,
                custom_fields: None,
            },
        )
        .await
        .unwrap();

    store
        .create_folder(CreateFolder {
            user_id: alice.user_id,
            name: "shelf".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    store
        .create_wishlist_entry(CreateWishlistEntry {
            user_id: alice.user_id,
            name: "White whale".to_string(),
            notes: None,
        })
        .await
        .unwrap();
    share(
        &store,
        Some(&alice),
        ShareRequest {
            collection_id: full.id,
        },
    )
    .await
    .unwrap();

    let stats = load_user_stats(&store, alice.user_id).await.unwrap();
    assert_eq!(
        stats,
        UserStats {
            items_total: 3,
            items_owned: 2,
            collections_created: 2,
            completed_collections: 1,
            community_shares: 1,
            folders_created: 1,
            wishlist_entries: 1,
        }
    );
}

// ---------------------------------------------------------------------------
// Best-effort boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_achievements_swallows_failures() {
    let store = MemoryStore::new();

    // No such user: apply_unlocks would fail, the best-effort wrapper
    // converts that into an empty list.
    let newly = check_achievements(&store, 9_999).await;
    assert!(newly.is_empty());
}
