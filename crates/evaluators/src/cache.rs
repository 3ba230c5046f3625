use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use supplyroute_model::EvalValue;

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    value: EvalValue,
    inserted_at: DateTime<Utc>,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

impl CacheStats {
    /// `hits / (hits + misses)`, 0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hits: {}, Misses: {}, Hit Rate: {:.1}%, Size: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.size
        )
    }
}

/// Memoizes evaluator results by [`crate::EvaluationContext::cache_key`].
///
/// No eviction and no expiry; entries live until `invalidate` or `clear`.
/// Safe to share across threads.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a value, counting a hit or a miss
    pub fn get(&self, key: &str) -> Option<EvalValue> {
        let value = self.entries().get(key).map(|entry| entry.value);
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    /// Insert or overwrite
    pub fn set(&self, key: impl Into<String>, value: EvalValue) {
        let key = key.into();
        self.entries().insert(
            key.clone(),
            CacheEntry {
                key,
                value,
                inserted_at: Utc::now(),
            },
        );
    }

    /// Return the cached value or compute and store it.
    ///
    /// `compute` runs without the lock held, so two threads may compute the
    /// same key; whichever inserts first wins and both return that value.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> EvalValue
    where
        F: FnOnce() -> EvalValue,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let computed = compute();
        let mut entries = self.entries();
        entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry {
                key: key.to_string(),
                value: computed,
                inserted_at: Utc::now(),
            })
            .value
    }

    /// Remove every entry whose key contains `pattern`; returns the count
    pub fn invalidate(&self, pattern: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.key.contains(pattern));
        let removed = before - entries.len();
        if removed > 0 {
            log::debug!("Invalidated {removed} cache entries matching {pattern:?}");
        }
        removed
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the entry for `key` was stored
    pub fn inserted_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries().get(key).map(|entry| entry.inserted_at)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}
