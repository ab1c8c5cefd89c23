// =============================================================================
// Result Cache — memoised analytics per (symbol list, period)
// =============================================================================
//
// Pure memoisation: an entry lives until `invalidate()`, there is no TTL.
//
// Each key owns a `tokio::sync::OnceCell`.  The map lock is only held long
// enough to find or create the cell; the computation runs inside
// `OnceCell::get_or_init`, so concurrent callers with the same key wait for
// the single in-flight computation instead of starting their own.
// =============================================================================

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::analytics::AnalyticsMap;

/// Exact cache key: symbol order matters.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub symbols: Vec<String>,
    pub period: String,
}

impl CacheKey {
    pub fn new(symbols: &[String], period: &str) -> Self {
        Self {
            symbols: symbols.to_vec(),
            period: period.to_string(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]@{}", self.symbols.join(","), self.period)
    }
}

/// Serialisable counters for diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

type Slot = Arc<OnceCell<Arc<AnalyticsMap>>>;

pub struct AnalyticsCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl AnalyticsCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Return the cached mapping for `key`, running `compute` only when no
    /// value exists yet.
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> Arc<AnalyticsMap>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AnalyticsMap>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(key.clone()).or_default().clone()
        };

        if let Some(value) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "analytics cache hit");
            return value.clone();
        }

        let computed = AtomicBool::new(false);
        let flag = &computed;
        let value = slot
            .get_or_init(|| async move {
                flag.store(true, Ordering::Relaxed);
                Arc::new(compute().await)
            })
            .await
            .clone();

        if computed.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, symbols = value.len(), "analytics cache filled");
        } else {
            // Another caller finished the computation while we waited.
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Drop every entry.  Idempotent.
    pub fn invalidate(&self) {
        let dropped = {
            let mut slots = self.slots.lock();
            let n = slots.len();
            slots.clear();
            n
        };
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        info!(dropped, "analytics cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl Default for AnalyticsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnalyticsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsCache")
            .field("stats", &self.stats())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
