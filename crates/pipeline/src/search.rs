//! External metadata search sources.
//!
//! Comic, card, and book databases are external collaborators; each is
//! registered under a string id and queried through one entry point that
//! enforces the configured timeout. An unknown source id is an error; an
//! empty result list is not.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use curio_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

// ---------------------------------------------------------------------------
// Collaborator contract
// ---------------------------------------------------------------------------

/// One candidate returned by a metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    /// Source-local identifier for a follow-up detail fetch.
    pub source_ref: Option<String>,
}

/// Failure from a metadata source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source request failed: {0}")]
    Request(String),

    #[error("Source returned a malformed response: {0}")]
    Malformed(String),
}

/// An external metadata database queried by free-text search.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Stable id the source is registered and addressed under.
    fn id(&self) -> &str;

    /// Search the source. An empty result list is a valid outcome.
    async fn search(&self, query: &str) -> Result<Vec<CandidateResult>, SourceError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry of metadata sources keyed by their string ids.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn MetadataSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own id, replacing any previous source
    /// with the same id.
    pub fn register(&mut self, source: Arc<dyn MetadataSource>) {
        self.sources.insert(source.id().to_string(), source);
    }

    /// Look up a source by id.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn MetadataSource>> {
        self.sources.get(id)
    }

    /// Registered source ids, sorted.
    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Search operation
// ---------------------------------------------------------------------------

/// Query one registered source under the configured timeout.
///
/// Source failures and timeouts surface as `Internal` with a generic
/// message; the detail goes to the log, not the caller.
pub async fn search_source(
    registry: &SourceRegistry,
    source_id: &str,
    query: &str,
    config: &PipelineConfig,
) -> Result<Vec<CandidateResult>, CoreError> {
    let source = registry.get(source_id).ok_or_else(|| {
        CoreError::Validation(format!("Unknown metadata source '{source_id}'"))
    })?;

    let query = query.trim();
    if query.is_empty() {
        return Err(CoreError::Validation("Search query must not be empty".into()));
    }

    let budget = Duration::from_secs(config.external_call_timeout_secs);
    match tokio::time::timeout(budget, source.search(query)).await {
        Ok(Ok(results)) => Ok(results),
        Ok(Err(err)) => {
            tracing::error!(source_id, error = %err, "metadata source failed");
            Err(CoreError::Internal(format!(
                "Metadata source '{source_id}' failed"
            )))
        }
        Err(_) => {
            tracing::error!(source_id, timeout_secs = config.external_call_timeout_secs, "metadata source timed out");
            Err(CoreError::Internal(format!(
                "Metadata source '{source_id}' timed out"
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSource {
        id: &'static str,
        results: Vec<CandidateResult>,
    }

    #[async_trait]
    impl MetadataSource for StubSource {
        fn id(&self) -> &str {
            self.id
        }

        async fn search(&self, _query: &str) -> Result<Vec<CandidateResult>, SourceError> {
            Ok(self.results.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl MetadataSource for FailingSource {
        fn id(&self) -> &str {
            "broken"
        }

        async fn search(&self, _query: &str) -> Result<Vec<CandidateResult>, SourceError> {
            Err(SourceError::Request("connection refused".into()))
        }
    }

    fn registry_with_stub(results: Vec<CandidateResult>) -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubSource {
            id: "comicdb",
            results,
        }));
        registry
    }

    #[tokio::test]
    async fn unknown_source_id_is_an_error() {
        let registry = registry_with_stub(Vec::new());
        let err = search_source(&registry, "no-such-db", "batman", &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_result_list_is_not_an_error() {
        let registry = registry_with_stub(Vec::new());
        let results = search_source(&registry, "comicdb", "batman", &PipelineConfig::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let registry = registry_with_stub(Vec::new());
        let err = search_source(&registry, "comicdb", "   ", &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn source_failure_surfaces_as_generic_internal_error() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(FailingSource));

        let err = search_source(&registry, "broken", "batman", &PipelineConfig::default())
            .await
            .unwrap_err();
        match err {
            CoreError::Internal(message) => {
                // The upstream detail stays in the log.
                assert!(!message.contains("connection refused"));
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn results_pass_through() {
        let registry = registry_with_stub(vec![CandidateResult {
            title: "Batman #1".into(),
            subtitle: Some("DC Comics".into()),
            image: None,
            source_ref: Some("cdb:401".into()),
        }]);
        let results = search_source(&registry, "comicdb", "batman", &PipelineConfig::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Batman #1");
    }
}
