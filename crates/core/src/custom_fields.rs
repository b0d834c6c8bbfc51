//! Custom-field schema types and validation.
//!
//! A collection may carry an ordered custom-field definition schema; items
//! in such a collection carry a value map keyed by field name. Validation
//! here is pure; `curio-pipeline` maps failures to
//! `CoreError::Validation`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of custom fields a collection schema may define.
pub const MAX_CUSTOM_FIELDS: usize = 20;

/// Maximum length of a single field name.
pub const MAX_FIELD_NAME_LENGTH: usize = 60;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single field descriptor in a collection's custom-field schema.
///
/// Field order is meaningful and preserved verbatim when a collection is
/// shared or cloned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a custom-field schema.
///
/// Rejects empty or oversized field names, duplicate names, and schemas
/// above [`MAX_CUSTOM_FIELDS`].
pub fn validate_definitions(definitions: &[CustomFieldDefinition]) -> Result<(), String> {
    if definitions.len() > MAX_CUSTOM_FIELDS {
        return Err(format!(
            "Too many custom fields: {} (maximum {MAX_CUSTOM_FIELDS})",
            definitions.len()
        ));
    }

    for (i, def) in definitions.iter().enumerate() {
        let name = def.name.trim();
        if name.is_empty() {
            return Err(format!("Custom field at position {i} has an empty name"));
        }
        if def.name.len() > MAX_FIELD_NAME_LENGTH {
            return Err(format!(
                "Custom field name '{}' exceeds {MAX_FIELD_NAME_LENGTH} characters",
                def.name
            ));
        }
        if definitions[..i].iter().any(|d| d.name == def.name) {
            return Err(format!("Duplicate custom field name '{}'", def.name));
        }
    }

    Ok(())
}

/// Validate an item's custom-field values against the owning collection's
/// schema.
///
/// Every key in `values` must name a field the schema defines. An empty
/// value map is always valid; a non-empty map against a schema-less
/// collection is rejected.
pub fn validate_values(
    definitions: Option<&[CustomFieldDefinition]>,
    values: &serde_json::Map<String, Value>,
) -> Result<(), String> {
    if values.is_empty() {
        return Ok(());
    }

    let Some(definitions) = definitions else {
        return Err("Collection has no custom field schema".to_string());
    };

    for key in values.keys() {
        if !definitions.iter().any(|d| d.name == *key) {
            return Err(format!("Unknown custom field '{key}'"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(names: &[&str]) -> Vec<CustomFieldDefinition> {
        names
            .iter()
            .map(|n| CustomFieldDefinition {
                name: n.to_string(),
            })
            .collect()
    }

    fn values(pairs: &[(&str, &str)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    // -- validate_definitions -------------------------------------------------

    #[test]
    fn empty_schema_is_valid() {
        assert!(validate_definitions(&[]).is_ok());
    }

    #[test]
    fn simple_schema_is_valid() {
        assert!(validate_definitions(&schema(&["grade", "edition"])).is_ok());
    }

    #[test]
    fn empty_field_name_rejected() {
        let err = validate_definitions(&schema(&["grade", "  "])).unwrap_err();
        assert!(err.contains("empty name"));
    }

    #[test]
    fn duplicate_field_name_rejected() {
        let err = validate_definitions(&schema(&["grade", "grade"])).unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn oversized_field_name_rejected() {
        let long = "x".repeat(MAX_FIELD_NAME_LENGTH + 1);
        let err = validate_definitions(&schema(&[long.as_str()])).unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn oversized_schema_rejected() {
        let names: Vec<String> = (0..=MAX_CUSTOM_FIELDS).map(|i| format!("f{i}")).collect();
        let defs: Vec<CustomFieldDefinition> = names
            .iter()
            .map(|n| CustomFieldDefinition { name: n.clone() })
            .collect();
        assert!(validate_definitions(&defs).is_err());
    }

    // -- validate_values ------------------------------------------------------

    #[test]
    fn empty_values_always_valid() {
        assert!(validate_values(None, &serde_json::Map::new()).is_ok());
    }

    #[test]
    fn values_matching_schema_valid() {
        let defs = schema(&["grade"]);
        assert!(validate_values(Some(&defs), &values(&[("grade", "PSA 9")])).is_ok());
    }

    #[test]
    fn unknown_field_rejected() {
        let defs = schema(&["grade"]);
        let err = validate_values(Some(&defs), &values(&[("condition", "mint")])).unwrap_err();
        assert!(err.contains("Unknown custom field"));
    }

    #[test]
    fn values_without_schema_rejected() {
        let err = validate_values(None, &values(&[("grade", "PSA 9")])).unwrap_err();
        assert!(err.contains("no custom field schema"));
    }
}
