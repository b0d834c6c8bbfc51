//! Pipeline configuration loaded from environment variables.

use curio_core::cache::DEFAULT_STALENESS_WINDOW_MS;

/// Tunables for the operation pipeline.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Staleness window for the request-deduplication cache, in
    /// milliseconds.
    pub cache_staleness_ms: u64,
    /// Budget for one external collaborator call (cover rendering,
    /// metadata search), in seconds.
    pub external_call_timeout_secs: u64,
    /// Maximum entries accepted in one bulk item-image batch.
    pub max_bulk_item_updates: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_staleness_ms: DEFAULT_STALENESS_WINDOW_MS,
            external_call_timeout_secs: 10,
            max_bulk_item_updates: 500,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `CACHE_STALENESS_MS`         | `5000`  |
    /// | `EXTERNAL_CALL_TIMEOUT_SECS` | `10`    |
    /// | `MAX_BULK_ITEM_UPDATES`      | `500`   |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cache_staleness_ms: u64 = std::env::var("CACHE_STALENESS_MS")
            .map(|v| v.parse().expect("CACHE_STALENESS_MS must be a valid u64"))
            .unwrap_or(defaults.cache_staleness_ms);

        let external_call_timeout_secs: u64 = std::env::var("EXTERNAL_CALL_TIMEOUT_SECS")
            .map(|v| {
                v.parse()
                    .expect("EXTERNAL_CALL_TIMEOUT_SECS must be a valid u64")
            })
            .unwrap_or(defaults.external_call_timeout_secs);

        let max_bulk_item_updates: usize = std::env::var("MAX_BULK_ITEM_UPDATES")
            .map(|v| v.parse().expect("MAX_BULK_ITEM_UPDATES must be a valid usize"))
            .unwrap_or(defaults.max_bulk_item_updates);

        Self {
            cache_staleness_ms,
            external_call_timeout_secs,
            max_bulk_item_updates,
        }
    }
}
