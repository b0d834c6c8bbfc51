//! In-memory reference backend for the data-store interface.
//!
//! All state lives behind one async mutex, so every composite operation
//! documented as atomic on the traits is atomic here by construction.
//! `BTreeMap`s keep iteration deterministic, which keeps test output
//! stable. Ids are allocated from a single monotonic counter, so "newest
//! first" orderings sort on id.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use curio_core::types::{DbId, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::collection::{Collection, CreateCollection, UpdateCollection};
use crate::models::community::{
    CommunityCollection, CommunityItem, CreateCommunityCollection, CreateCommunityItem,
};
use crate::models::folder::{CreateFolder, Folder};
use crate::models::item::{CollectionItemCounts, CreateItem, Item, ItemImageUpdate, UpdateItem};
use crate::models::moderation::{
    BlogPost, ContentReport, CreateBlogPost, CreateContentReport, CreateVerificationToken,
    VerificationToken,
};
use crate::models::recommended::{
    CreateRecommendedCollection, CreateRecommendedItem, RecommendedCollection, RecommendedItem,
    UpdateRecommendedCollection,
};
use crate::models::user::{CreateUser, User};
use crate::models::wishlist::{CreateWishlistEntry, WishlistEntry};
use crate::store::{
    CollectionStore, CommunityStore, FolderStore, ItemStore, ModerationStore, RecommendedStore,
    StoreError, StoreResult, UserStore, WishlistStore,
};

#[derive(Default)]
struct State {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    collections: BTreeMap<DbId, Collection>,
    items: BTreeMap<DbId, Item>,
    community_collections: BTreeMap<DbId, CommunityCollection>,
    community_items: BTreeMap<DbId, CommunityItem>,
    recommended_collections: BTreeMap<DbId, RecommendedCollection>,
    recommended_items: BTreeMap<DbId, RecommendedItem>,
    folders: BTreeMap<DbId, Folder>,
    wishlist: BTreeMap<DbId, WishlistEntry>,
    blog_posts: BTreeMap<DbId, BlogPost>,
    content_reports: BTreeMap<DbId, ContentReport>,
    verification_tokens: BTreeMap<DbId, VerificationToken>,
}

impl State {
    fn alloc(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn build_item(&mut self, collection_id: DbId, input: CreateItem, now: Timestamp) -> Item {
        Item {
            id: self.alloc(),
            collection_id,
            name: input.name,
            number: input.number,
            notes: input.notes,
            image: input.image,
            is_owned: input.is_owned,
            custom_fields: input.custom_fields,
            created_at: now,
        }
    }
}

/// Sort key implementing the `(number, name)` ordering with numberless
/// rows last.
fn number_name_key(number: Option<i32>, name: &str) -> (bool, i32, String) {
    (number.is_none(), number.unwrap_or(0), name.to_string())
}

/// In-memory [`crate::store::Store`] backend.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict(format!(
                "username '{}' is already taken",
                input.username
            )));
        }
        let user = User {
            id: state.alloc(),
            username: input.username,
            is_admin: input.is_admin,
            is_verified: false,
            is_private: input.is_private,
            badge: None,
            achievements: Vec::new(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn set_user_achievements(
        &self,
        id: DbId,
        achievements: Vec<String>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.achievements = achievements;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_user_verified(&self, id: DbId, verified: bool) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.is_verified = verified;
            user.clone()
        }))
    }

    async fn set_user_badge(
        &self,
        id: DbId,
        badge: Option<String>,
    ) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.badge = badge;
            user.clone()
        }))
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create_collection(&self, input: CreateCollection) -> StoreResult<Collection> {
        let mut state = self.state.lock().await;
        let collection = build_collection(&mut state, input);
        state.collections.insert(collection.id, collection.clone());
        Ok(collection)
    }

    async fn create_collection_with_items(
        &self,
        input: CreateCollection,
        items: Vec<CreateItem>,
    ) -> StoreResult<(Collection, Vec<Item>)> {
        let mut state = self.state.lock().await;
        let collection = build_collection(&mut state, input);
        state.collections.insert(collection.id, collection.clone());

        let now = collection.created_at;
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let item = state.build_item(collection.id, item, now);
            state.items.insert(item.id, item.clone());
            created.push(item);
        }
        Ok((collection, created))
    }

    async fn find_collection(&self, id: DbId) -> StoreResult<Option<Collection>> {
        Ok(self.state.lock().await.collections.get(&id).cloned())
    }

    async fn find_collection_by_share_token(
        &self,
        token: Uuid,
    ) -> StoreResult<Option<Collection>> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .values()
            .find(|c| c.share_token == Some(token))
            .cloned())
    }

    async fn list_collections_for_user(
        &self,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Collection>> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .values()
            .rev()
            .filter(|c| c.user_id == user_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_collections_missing_covers(&self) -> StoreResult<Vec<Collection>> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .values()
            .filter(|c| c.cover_image.as_deref().is_none_or(str::is_empty))
            .cloned()
            .collect())
    }

    async fn update_collection(
        &self,
        id: DbId,
        input: UpdateCollection,
    ) -> StoreResult<Option<Collection>> {
        let mut state = self.state.lock().await;
        Ok(state.collections.get_mut(&id).map(|c| {
            if let Some(name) = input.name {
                c.name = name;
            }
            if let Some(description) = input.description {
                c.description = Some(description);
            }
            if let Some(category) = input.category {
                c.category = Some(category);
            }
            if let Some(template) = input.template {
                c.template = Some(template);
            }
            if let Some(cover_image) = input.cover_image {
                c.cover_image = Some(cover_image);
            }
            if let Some(fit) = input.cover_image_fit {
                c.cover_image_fit = fit;
            }
            if let Some(tags) = input.tags {
                c.tags = tags;
            }
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete_collection_cascade(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.collections.remove(&id).is_some();
        if removed {
            state.items.retain(|_, item| item.collection_id != id);
        }
        Ok(removed)
    }

    async fn set_shared_to_community(
        &self,
        id: DbId,
        community_id: Option<DbId>,
    ) -> StoreResult<Option<Collection>> {
        let mut state = self.state.lock().await;
        Ok(state.collections.get_mut(&id).map(|c| {
            c.shared_to_community_id = community_id;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn set_share_token(
        &self,
        id: DbId,
        token: Option<Uuid>,
    ) -> StoreResult<Option<Collection>> {
        let mut state = self.state.lock().await;
        Ok(state.collections.get_mut(&id).map(|c| {
            c.share_token = token;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn move_collection_to_folder(
        &self,
        id: DbId,
        folder_id: Option<DbId>,
    ) -> StoreResult<Option<Collection>> {
        let mut state = self.state.lock().await;
        Ok(state.collections.get_mut(&id).map(|c| {
            c.folder_id = folder_id;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn detach_collections_from_folder(&self, folder_id: DbId) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        let mut detached = 0;
        for collection in state.collections.values_mut() {
            if collection.folder_id == Some(folder_id) {
                collection.folder_id = None;
                detached += 1;
            }
        }
        Ok(detached)
    }

    async fn count_collections_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .values()
            .filter(|c| c.user_id == user_id)
            .count() as u64)
    }
}

fn build_collection(state: &mut State, input: CreateCollection) -> Collection {
    let now = Utc::now();
    Collection {
        id: state.alloc(),
        user_id: input.user_id,
        name: input.name,
        description: input.description,
        category: input.category,
        template: input.template,
        custom_field_definitions: input.custom_field_definitions,
        cover_image: input.cover_image,
        cover_image_fit: input.cover_image_fit,
        tags: input.tags,
        folder_id: input.folder_id,
        source_recommended_id: input.source_recommended_id,
        source_community_id: input.source_community_id,
        shared_to_community_id: None,
        share_token: None,
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_item(&self, collection_id: DbId, input: CreateItem) -> StoreResult<Item> {
        let mut state = self.state.lock().await;
        let item = state.build_item(collection_id, input, Utc::now());
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn create_items_skip_duplicates(
        &self,
        collection_id: DbId,
        items: Vec<CreateItem>,
    ) -> StoreResult<Vec<Item>> {
        let mut state = self.state.lock().await;
        let mut seen: HashSet<(String, Option<i32>)> = state
            .items
            .values()
            .filter(|i| i.collection_id == collection_id)
            .map(|i| (i.name.clone(), i.number))
            .collect();

        let now = Utc::now();
        let mut created = Vec::new();
        for input in items {
            if !seen.insert((input.name.clone(), input.number)) {
                continue;
            }
            let item = state.build_item(collection_id, input, now);
            state.items.insert(item.id, item.clone());
            created.push(item);
        }
        Ok(created)
    }

    async fn find_item(&self, id: DbId) -> StoreResult<Option<Item>> {
        Ok(self.state.lock().await.items.get(&id).cloned())
    }

    async fn list_items_for_collection(&self, collection_id: DbId) -> StoreResult<Vec<Item>> {
        let state = self.state.lock().await;
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|i| i.collection_id == collection_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| number_name_key(i.number, &i.name));
        Ok(items)
    }

    async fn update_item(&self, id: DbId, input: UpdateItem) -> StoreResult<Option<Item>> {
        let mut state = self.state.lock().await;
        Ok(state.items.get_mut(&id).map(|item| {
            if let Some(name) = input.name {
                item.name = name;
            }
            if let Some(number) = input.number {
                item.number = Some(number);
            }
            if let Some(notes) = input.notes {
                item.notes = Some(notes);
            }
            if let Some(image) = input.image {
                item.image = Some(image);
            }
            if let Some(is_owned) = input.is_owned {
                item.is_owned = is_owned;
            }
            if let Some(custom_fields) = input.custom_fields {
                item.custom_fields = Some(custom_fields);
            }
            item.clone()
        }))
    }

    async fn delete_item(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.items.remove(&id).is_some())
    }

    async fn update_item_images(
        &self,
        collection_id: DbId,
        updates: &[ItemImageUpdate],
    ) -> StoreResult<Vec<Item>> {
        let mut state = self.state.lock().await;

        // Validate the whole batch before touching anything.
        for update in updates {
            match state.items.get(&update.item_id) {
                Some(item) if item.collection_id == collection_id => {}
                Some(_) => {
                    return Err(StoreError::Conflict(format!(
                        "item {} does not belong to collection {collection_id}",
                        update.item_id
                    )))
                }
                None => {
                    return Err(StoreError::Conflict(format!(
                        "item {} does not exist",
                        update.item_id
                    )))
                }
            }
        }

        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            // Presence was just validated under the same lock.
            if let Some(item) = state.items.get_mut(&update.item_id) {
                item.image = Some(update.image.clone());
                updated.push(item.clone());
            }
        }
        Ok(updated)
    }

    async fn item_counts_by_collection(
        &self,
        user_id: DbId,
    ) -> StoreResult<Vec<CollectionItemCounts>> {
        let state = self.state.lock().await;
        let mut counts = Vec::new();
        for collection in state.collections.values().filter(|c| c.user_id == user_id) {
            let mut items = 0;
            let mut owned = 0;
            for item in state.items.values() {
                if item.collection_id == collection.id {
                    items += 1;
                    if item.is_owned {
                        owned += 1;
                    }
                }
            }
            counts.push(CollectionItemCounts {
                collection_id: collection.id,
                items,
                owned,
            });
        }
        Ok(counts)
    }
}

// ---------------------------------------------------------------------------
// Community collections
// ---------------------------------------------------------------------------

#[async_trait]
impl CommunityStore for MemoryStore {
    async fn create_community_collection_with_items(
        &self,
        input: CreateCommunityCollection,
        items: Vec<CreateCommunityItem>,
    ) -> StoreResult<(CommunityCollection, Vec<CommunityItem>)> {
        let mut state = self.state.lock().await;
        let collection = CommunityCollection {
            id: state.alloc(),
            user_id: input.user_id,
            name: input.name,
            description: input.description,
            category: input.category,
            template: input.template,
            custom_field_definitions: input.custom_field_definitions,
            cover_image: input.cover_image,
            cover_image_fit: input.cover_image_fit,
            tags: input.tags,
            created_at: Utc::now(),
        };
        state
            .community_collections
            .insert(collection.id, collection.clone());

        let mut created = Vec::with_capacity(items.len());
        for input in items {
            let item = CommunityItem {
                id: state.alloc(),
                community_collection_id: collection.id,
                name: input.name,
                number: input.number,
                notes: input.notes,
                image: input.image,
                custom_fields: input.custom_fields,
            };
            state.community_items.insert(item.id, item.clone());
            created.push(item);
        }
        Ok((collection, created))
    }

    async fn find_community_collection(
        &self,
        id: DbId,
    ) -> StoreResult<Option<CommunityCollection>> {
        Ok(self
            .state
            .lock()
            .await
            .community_collections
            .get(&id)
            .cloned())
    }

    async fn list_community_collections(
        &self,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CommunityCollection>> {
        let state = self.state.lock().await;
        Ok(state
            .community_collections
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_community_items(
        &self,
        community_collection_id: DbId,
    ) -> StoreResult<Vec<CommunityItem>> {
        let state = self.state.lock().await;
        let mut items: Vec<CommunityItem> = state
            .community_items
            .values()
            .filter(|i| i.community_collection_id == community_collection_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| number_name_key(i.number, &i.name));
        Ok(items)
    }

    async fn delete_community_collection_cascade(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.community_collections.remove(&id).is_some();
        if removed {
            state
                .community_items
                .retain(|_, item| item.community_collection_id != id);
        }
        Ok(removed)
    }

    async fn count_community_collections_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .community_collections
            .values()
            .filter(|c| c.user_id == user_id)
            .count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Recommended catalog
// ---------------------------------------------------------------------------

#[async_trait]
impl RecommendedStore for MemoryStore {
    async fn create_recommended_collection_with_items(
        &self,
        input: CreateRecommendedCollection,
        items: Vec<CreateRecommendedItem>,
    ) -> StoreResult<(RecommendedCollection, Vec<RecommendedItem>)> {
        let mut state = self.state.lock().await;
        let collection = RecommendedCollection {
            id: state.alloc(),
            name: input.name,
            description: input.description,
            category: input.category,
            template: input.template,
            custom_field_definitions: input.custom_field_definitions,
            cover_image: input.cover_image,
            cover_image_fit: input.cover_image_fit,
            tags: input.tags,
            created_at: Utc::now(),
        };
        state
            .recommended_collections
            .insert(collection.id, collection.clone());

        let mut created = Vec::with_capacity(items.len());
        for input in items {
            let item = RecommendedItem {
                id: state.alloc(),
                recommended_collection_id: collection.id,
                name: input.name,
                number: input.number,
                notes: input.notes,
                image: input.image,
                custom_fields: input.custom_fields,
            };
            state.recommended_items.insert(item.id, item.clone());
            created.push(item);
        }
        Ok((collection, created))
    }

    async fn find_recommended_collection(
        &self,
        id: DbId,
    ) -> StoreResult<Option<RecommendedCollection>> {
        Ok(self
            .state
            .lock()
            .await
            .recommended_collections
            .get(&id)
            .cloned())
    }

    async fn list_recommended_collections(
        &self,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<RecommendedCollection>> {
        let state = self.state.lock().await;
        Ok(state
            .recommended_collections
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_recommended_items(
        &self,
        recommended_collection_id: DbId,
    ) -> StoreResult<Vec<RecommendedItem>> {
        let state = self.state.lock().await;
        let mut items: Vec<RecommendedItem> = state
            .recommended_items
            .values()
            .filter(|i| i.recommended_collection_id == recommended_collection_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| number_name_key(i.number, &i.name));
        Ok(items)
    }

    async fn update_recommended_collection(
        &self,
        id: DbId,
        input: UpdateRecommendedCollection,
    ) -> StoreResult<Option<RecommendedCollection>> {
        let mut state = self.state.lock().await;
        Ok(state.recommended_collections.get_mut(&id).map(|c| {
            if let Some(name) = input.name {
                c.name = name;
            }
            if let Some(description) = input.description {
                c.description = Some(description);
            }
            if let Some(category) = input.category {
                c.category = Some(category);
            }
            if let Some(template) = input.template {
                c.template = Some(template);
            }
            if let Some(cover_image) = input.cover_image {
                c.cover_image = Some(cover_image);
            }
            if let Some(fit) = input.cover_image_fit {
                c.cover_image_fit = fit;
            }
            if let Some(tags) = input.tags {
                c.tags = tags;
            }
            c.clone()
        }))
    }

    async fn delete_recommended_collection_cascade(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.recommended_collections.remove(&id).is_some();
        if removed {
            state
                .recommended_items
                .retain(|_, item| item.recommended_collection_id != id);
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

#[async_trait]
impl FolderStore for MemoryStore {
    async fn create_folder(&self, input: CreateFolder) -> StoreResult<Folder> {
        let mut state = self.state.lock().await;
        let folder = Folder {
            id: state.alloc(),
            user_id: input.user_id,
            name: input.name,
            parent_id: input.parent_id,
            created_at: Utc::now(),
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_folder(&self, id: DbId) -> StoreResult<Option<Folder>> {
        Ok(self.state.lock().await.folders.get(&id).cloned())
    }

    async fn list_folders_for_user(&self, user_id: DbId) -> StoreResult<Vec<Folder>> {
        let state = self.state.lock().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn list_child_folders(&self, parent_id: DbId) -> StoreResult<Vec<Folder>> {
        let state = self.state.lock().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn set_folder_parent(
        &self,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> StoreResult<Option<Folder>> {
        let mut state = self.state.lock().await;
        Ok(state.folders.get_mut(&id).map(|f| {
            f.parent_id = parent_id;
            f.clone()
        }))
    }

    async fn delete_folder(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.folders.remove(&id).is_some())
    }

    async fn count_folders_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn create_wishlist_entry(
        &self,
        input: CreateWishlistEntry,
    ) -> StoreResult<WishlistEntry> {
        let mut state = self.state.lock().await;
        let entry = WishlistEntry {
            id: state.alloc(),
            user_id: input.user_id,
            name: input.name,
            notes: input.notes,
            created_at: Utc::now(),
        };
        state.wishlist.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn list_wishlist_for_user(&self, user_id: DbId) -> StoreResult<Vec<WishlistEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .wishlist
            .values()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_wishlist_entry(&self, id: DbId) -> StoreResult<Option<WishlistEntry>> {
        Ok(self.state.lock().await.wishlist.get(&id).cloned())
    }

    async fn delete_wishlist_entry(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.wishlist.remove(&id).is_some())
    }

    async fn count_wishlist_entries_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .wishlist
            .values()
            .filter(|e| e.user_id == user_id)
            .count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Blog, reports, verification tokens
// ---------------------------------------------------------------------------

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn create_blog_post(&self, input: CreateBlogPost) -> StoreResult<BlogPost> {
        let mut state = self.state.lock().await;
        let post = BlogPost {
            id: state.alloc(),
            author_id: input.author_id,
            title: input.title,
            body: input.body,
            published_at: Utc::now(),
        };
        state.blog_posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list_blog_posts(&self, limit: i64, offset: i64) -> StoreResult<Vec<BlogPost>> {
        let state = self.state.lock().await;
        Ok(state
            .blog_posts
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create_content_report(
        &self,
        input: CreateContentReport,
    ) -> StoreResult<ContentReport> {
        let mut state = self.state.lock().await;
        let report = ContentReport {
            id: state.alloc(),
            reporter_id: input.reporter_id,
            community_collection_id: input.community_collection_id,
            reason: input.reason,
            resolved: false,
            created_at: Utc::now(),
        };
        state.content_reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn list_open_content_reports(&self) -> StoreResult<Vec<ContentReport>> {
        let state = self.state.lock().await;
        Ok(state
            .content_reports
            .values()
            .filter(|r| !r.resolved)
            .cloned()
            .collect())
    }

    async fn resolve_content_report(&self, id: DbId) -> StoreResult<Option<ContentReport>> {
        let mut state = self.state.lock().await;
        Ok(state.content_reports.get_mut(&id).map(|r| {
            r.resolved = true;
            r.clone()
        }))
    }

    async fn create_verification_token(
        &self,
        input: CreateVerificationToken,
    ) -> StoreResult<VerificationToken> {
        let mut state = self.state.lock().await;
        let token = VerificationToken {
            id: state.alloc(),
            user_id: input.user_id,
            token: input.token,
            expires_at: input.expires_at,
            consumed: false,
        };
        state.verification_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn consume_verification_token(
        &self,
        token: Uuid,
        now: Timestamp,
    ) -> StoreResult<Option<VerificationToken>> {
        let mut state = self.state.lock().await;
        let row = state
            .verification_tokens
            .values_mut()
            .find(|t| t.token == token && !t.consumed && t.expires_at > now);
        Ok(row.map(|t| {
            t.consumed = true;
            t.clone()
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
