//! Externally owned terminology cache
//!
//! The reasoning core holds no state between sessions. Callers that want to
//! reuse terminology lookups across queries own a `ConceptCache` and wrap
//! their source in `CachedTerminology`. Eviction is least-recently-used with
//! a fixed capacity.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{ReasonerError, ReasonerResult};
use crate::types::{ConceptRecord, TripleRecord};

use super::TerminologySource;

#[derive(Debug, Default, Clone)]
struct CacheEntry {
    concept: Option<Option<ConceptRecord>>,
    relations: Option<Vec<TripleRecord>>,
}

/// Hit/miss counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState {
    entries: LruCache<String, CacheEntry>,
    stats: CacheStats,
}

/// LRU cache of terminology lookups keyed by concept id
pub struct ConceptCache {
    state: Mutex<CacheState>,
}

impl ConceptCache {
    pub fn new(capacity: usize) -> ReasonerResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            ReasonerError::Configuration("cache capacity must be positive".to_string())
        })?;
        Ok(Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        })
    }

    /// Cached concept lookup; the outer `None` means not cached
    pub fn get_concept(&self, id: &str) -> Option<Option<ConceptRecord>> {
        let mut state = self.state.lock();
        let cached = state.entries.get(id).and_then(|e| e.concept.clone());
        state.record(cached.is_some());
        cached
    }

    pub fn put_concept(&self, id: &str, concept: Option<ConceptRecord>) {
        let mut state = self.state.lock();
        state.entry_mut(id).concept = Some(concept);
    }

    pub fn get_relations(&self, id: &str) -> Option<Vec<TripleRecord>> {
        let mut state = self.state.lock();
        let cached = state.entries.get(id).and_then(|e| e.relations.clone());
        state.record(cached.is_some());
        cached
    }

    pub fn put_relations(&self, id: &str, relations: Vec<TripleRecord>) {
        let mut state = self.state.lock();
        state.entry_mut(id).relations = Some(relations);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().entries.contains(id)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            size: state.entries.len(),
            ..state.stats
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
    }
}

impl CacheState {
    fn record(&mut self, hit: bool) {
        if hit {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
    }

    fn entry_mut(&mut self, id: &str) -> &mut CacheEntry {
        self.entries
            .get_or_insert_mut(id.to_string(), CacheEntry::default)
    }
}

/// Terminology source that consults a shared cache before the inner source
pub struct CachedTerminology<S> {
    inner: S,
    cache: Arc<ConceptCache>,
}

impl<S: TerminologySource> CachedTerminology<S> {
    pub fn new(inner: S, cache: Arc<ConceptCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &ConceptCache {
        &self.cache
    }
}

impl<S: TerminologySource> TerminologySource for CachedTerminology<S> {
    fn concept(&self, id: &str) -> Option<ConceptRecord> {
        if let Some(cached) = self.cache.get_concept(id) {
            return cached;
        }
        let concept = self.inner.concept(id);
        self.cache.put_concept(id, concept.clone());
        concept
    }

    fn relations(&self, id: &str) -> Vec<TripleRecord> {
        if let Some(cached) = self.cache.get_relations(id) {
            return cached;
        }
        let relations = self.inner.relations(id);
        self.cache.put_relations(id, relations.clone());
        relations
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl TerminologySource for CountingSource {
        fn concept(&self, id: &str) -> Option<ConceptRecord> {
            self.calls.set(self.calls.get() + 1);
            (id != "missing").then(|| ConceptRecord::new(id, "Name"))
        }

        fn relations(&self, id: &str) -> Vec<TripleRecord> {
            self.calls.set(self.calls.get() + 1);
            vec![TripleRecord::new(id, "isa", "C0")]
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(ConceptCache::new(0), Err(ReasonerError::Configuration(_))));
    }

    #[test]
    fn test_cached_source_hits_inner_once() {
        let cache = Arc::new(ConceptCache::new(8).unwrap());
        let source = CachedTerminology::new(CountingSource { calls: Cell::new(0) }, cache.clone());

        assert_eq!(source.concept("C1").unwrap().id, "C1");
        assert_eq!(source.concept("C1").unwrap().id, "C1");
        assert_eq!(source.relations("C1").len(), 1);
        assert_eq!(source.relations("C1").len(), 1);
        assert_eq!(source.inner.calls.get(), 2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_lookups_are_cached() {
        let cache = Arc::new(ConceptCache::new(8).unwrap());
        let source = CachedTerminology::new(CountingSource { calls: Cell::new(0) }, cache);

        assert!(source.concept("missing").is_none());
        assert!(source.concept("missing").is_none());
        assert_eq!(source.inner.calls.get(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ConceptCache::new(2).unwrap();
        cache.put_concept("A", None);
        cache.put_concept("B", None);
        assert!(cache.get_concept("A").is_some());
        cache.put_concept("C", None);

        assert!(cache.contains("A"));
        assert!(!cache.contains("B"));
        assert!(cache.contains("C"));
        assert_eq!(cache.stats().size, 2);
    }
}
