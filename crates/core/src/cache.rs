//! Request-deduplication cache with an injected clock.
//!
//! [`RequestCache`] collapses concurrent identical reads, keyed by a
//! logical request identity (e.g. `"collections:user:7"`), into one
//! underlying fetch and fans the single result out to every waiter. An
//! entry expires a fixed staleness window after insertion whether or not
//! its fetch has completed, so a hung fetch can never serve waiters
//! indefinitely and memory stays bounded.
//!
//! The cache is advisory: it shortens latency, never correctness. Callers
//! must produce identical results with the cache bypassed.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::Mutex;

use crate::error::CoreError;

/// Default staleness window for cached entries, in milliseconds.
pub const DEFAULT_STALENESS_WINDOW_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Millisecond clock, injectable so tests control time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// RequestCache
// ---------------------------------------------------------------------------

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, CoreError>>>;

struct Entry<T: Clone> {
    inserted_at_ms: u64,
    fetch: SharedFetch<T>,
}

/// Collapses concurrent identical in-flight reads into one fetch.
///
/// A completed result, success or failure, keeps serving waiters until the
/// staleness window elapses; after that the next caller triggers a fresh
/// fetch and replaces the entry.
pub struct RequestCache<T: Clone> {
    entries: Mutex<HashMap<String, Entry<T>>>,
    window_ms: u64,
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Send + Sync + 'static> RequestCache<T> {
    /// Create a cache with an explicit staleness window and clock.
    pub fn new(window_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window_ms,
            clock,
        }
    }

    /// Create a cache with the default window and the system clock.
    pub fn with_system_clock() -> Self {
        Self::new(DEFAULT_STALENESS_WINDOW_MS, Arc::new(SystemClock))
    }

    /// Return the cached result for `key`, joining an in-flight fetch if
    /// one exists, or run `fetch` and cache it.
    ///
    /// `fetch` is dropped unexecuted when a live entry exists.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let now = self.clock.now_millis();

        let shared = {
            let mut entries = self.entries.lock().await;
            entries.retain(|_, e| now.saturating_sub(e.inserted_at_ms) < self.window_ms);

            match entries.get(key) {
                Some(entry) => entry.fetch.clone(),
                None => {
                    let shared = fetch.boxed().shared();
                    entries.insert(
                        key.to_string(),
                        Entry {
                            inserted_at_ms: now,
                            fetch: shared.clone(),
                        },
                    );
                    shared
                }
            }
        };

        shared.await
    }

    /// Drop a single entry, e.g. after a write made it stale.
    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Drop every entry whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.entries
            .lock()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }

    /// Number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| now.saturating_sub(e.inserted_at_ms) < self.window_ms);
        entries.len()
    }

    /// Whether the cache currently holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
