use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::NaiveDate;

use super::model::MetricSeries;

/// Everything that determines a generated series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: String,
    pub seed: u64,
    pub length: usize,
    pub start: NaiveDate,
}

// ---------------------------------------------------------------------------
// SeriesCache – memoised generation results
// ---------------------------------------------------------------------------

/// Insert-if-absent memo of generated series.
///
/// Entries are never replaced or evicted: a key always maps to the series its
/// parameters produce, so a hit and a miss return equal data.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: Mutex<HashMap<CacheKey, Arc<MetricSeries>>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached series for `key`, or build, store and return it.
    ///
    /// `build` runs under the lock so two callers cannot both insert.
    pub fn get_or_try_insert<E>(
        &self,
        key: CacheKey,
        build: impl FnOnce() -> Result<MetricSeries, E>,
    ) -> Result<Arc<MetricSeries>, E> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(hit) = entries.get(&key) {
            log::trace!("cache hit for '{}' (seed {})", key.name, key.seed);
            return Ok(Arc::clone(hit));
        }
        let series = Arc::new(build()?);
        entries.insert(key, Arc::clone(&series));
        Ok(series)
    }
}

static GLOBAL_CACHE: OnceLock<SeriesCache> = OnceLock::new();

/// The process-wide cache used by `get_metric`.
pub fn global() -> &'static SeriesCache {
    GLOBAL_CACHE.get_or_init(SeriesCache::new)
}
