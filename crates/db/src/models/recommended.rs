//! Recommended (admin-curated) collection entity models and DTOs.

use curio_core::custom_fields::CustomFieldDefinition;
use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::collection::CoverImageFit;

/// Full recommended collection row. Visible to all users; only admin
/// operations create or mutate these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedCollection {
    pub id: DbId,
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

/// DTO for creating a recommended collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecommendedCollection {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub custom_field_definitions: Option<Vec<CustomFieldDefinition>>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub cover_image_fit: CoverImageFit,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for updating a recommended collection. Only `Some` fields apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecommendedCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub cover_image: Option<String>,
    pub cover_image_fit: Option<CoverImageFit>,
    pub tags: Option<Vec<String>>,
}

/// Full recommended item row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub id: DbId,
    pub recommended_collection_id: DbId,
    pub name: String,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}

/// DTO for creating a recommended item. The parent id comes from the call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecommendedItem {
    pub name: String,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}
