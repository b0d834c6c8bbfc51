/// Database primary-key type shared by all entities.
pub type DbId = i64;

/// Timestamp type shared by all entities (UTC).
pub type Timestamp = chrono::DateTime<chrono::Utc>;
