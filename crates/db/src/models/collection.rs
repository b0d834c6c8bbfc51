//! Collection entity model and DTOs.

use curio_core::custom_fields::CustomFieldDefinition;
use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a collection's cover image is fitted into its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverImageFit {
    #[default]
    Cover,
    Contain,
}

/// Full collection row. Items are stored separately (see
/// [`crate::models::Item`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Optional template tag, e.g. `"trading-card"`.
    pub template: Option<String>,
    /// Ordered custom-field schema items in this collection key their
    /// custom values by.
    pub custom_field_definitions: Option<Vec<CustomFieldDefinition>>,
    pub cover_image: Option<String>,
    pub cover_image_fit: CoverImageFit,
    pub tags: Vec<String>,
    /// Weak reference: deleting the folder detaches, never deletes.
    pub folder_id: Option<DbId>,
    /// Lineage: the recommended collection this was cloned from.
    pub source_recommended_id: Option<DbId>,
    /// Lineage: the community collection this was cloned from.
    pub source_community_id: Option<DbId>,
    /// The live community fork, if this collection is currently shared.
    pub shared_to_community_id: Option<DbId>,
    /// Public share token; `None` while public sharing is off.
    pub share_token: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a collection, directly or through the clone pipeline.
///
/// Share state (`shared_to_community_id`, `share_token`) is never part of
/// creation; it is set through dedicated store operations.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollection {
    pub user_id: DbId,
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
    pub folder_id: Option<DbId>,
    pub source_recommended_id: Option<DbId>,
    pub source_community_id: Option<DbId>,
}

/// DTO for updating a collection. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub template: Option<String>,
    pub cover_image: Option<String>,
    pub cover_image_fit: Option<CoverImageFit>,
    pub tags: Option<Vec<String>>,
}
