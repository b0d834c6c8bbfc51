//! Item entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full item row. Belongs to exactly one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    /// Issue/card number used for ordering within the collection.
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub is_owned: bool,
    /// Custom-field values keyed by the owning collection's schema.
    pub custom_fields: Option<serde_json::Map<String, Value>>,
    pub created_at: Timestamp,
}

/// DTO for creating an item. The collection id comes from the call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub is_owned: bool,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}

/// DTO for updating an item. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub number: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub is_owned: Option<bool>,
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}

/// One (item, image) pair in a bulk image assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemImageUpdate {
    pub item_id: DbId,
    pub image: String,
}

/// Per-collection item tally used for statistics aggregation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CollectionItemCounts {
    pub collection_id: DbId,
    pub items: u64,
    pub owned: u64,
}
