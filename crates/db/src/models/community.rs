//! Community collection entity models and DTOs.
//!
//! A community collection is a structural copy of a personal collection at
//! the moment it was shared: its items are fresh rows, never references,
//! so later edits to the original never propagate.

use curio_core::custom_fields::CustomFieldDefinition;
use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::collection::CoverImageFit;

/// Full community collection row. Owned by the sharing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityCollection {
    pub id: DbId,
    /// The sharer; the fork's owner.
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub custom_field_definitions: Option<Vec<CustomFieldDefinition>>,
    pub cover_image: Option<String>,
    pub cover_image_fit: CoverImageFit,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a community collection.
#[derive(Debug, Clone)]
pub struct CreateCommunityCollection {
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub custom_field_definitions: Option<Vec<CustomFieldDefinition>>,
    pub cover_image: Option<String>,
    pub cover_image_fit: CoverImageFit,
    pub tags: Vec<String>,
}

/// Full community item row.
///
/// Carries no ownership flag: owned/not-owned is per-user state and stays
/// behind on the personal side of the fork.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityItem {
    pub id: DbId,
    pub community_collection_id: DbId,
    pub name: String,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}

/// DTO for creating a community item. The parent id comes from the call.
#[derive(Debug, Clone)]
pub struct CreateCommunityItem {
    pub name: String,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}
