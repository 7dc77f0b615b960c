//! In-memory playlist assembly cache.
//!
//! A playlist build is a deterministic read-only projection over slow-
//! changing catalog data, so assemblies are memoized by a fingerprint of
//! the request parameters with a multi-hour TTL. The cached value is the
//! pre-signing segment-group list; signing is re-applied per response so
//! each reply carries fresh expiries and its own transaction id. Concurrent
//! duplicate computation on a miss is acceptable.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use versecast_common::Result;
use versecast_media::SegmentGroup;

struct CacheEntry {
    groups: Arc<Vec<SegmentGroup>>,
    created: Instant,
}

/// Thread-safe TTL cache for assembled segment groups.
pub struct PlaylistCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,
}

impl PlaylistCache {
    /// Create a new cache.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Get cached groups for a fingerprint, or compute and cache them.
    pub fn get_or_compute<F>(&self, fingerprint: &str, compute: F) -> Result<Arc<Vec<SegmentGroup>>>
    where
        F: FnOnce() -> Result<Vec<SegmentGroup>>,
    {
        if let Some(entry) = self.entries.get(fingerprint) {
            if entry.created.elapsed() < self.ttl {
                return Ok(Arc::clone(&entry.groups));
            }
            drop(entry);
            self.entries.remove(fingerprint);
        }

        let groups = Arc::new(compute()?);

        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.entries.insert(
            fingerprint.to_string(),
            CacheEntry {
                groups: Arc::clone(&groups),
                created: Instant::now(),
            },
        );

        Ok(groups)
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.created)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for PlaylistCache {
    fn default() -> Self {
        // Default: 512 entries, 6 hour TTL
        Self::new(512, 6 * 3600)
    }
}

/// Deterministic fingerprint over request parameters.
///
/// Parts are joined with an unambiguous separator and hashed, so two
/// requests fingerprint equal exactly when every parameter matches.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use versecast_media::{DiscreteSegment, SegmentList};

    fn group(name: &str) -> SegmentGroup {
        SegmentGroup {
            label: None,
            prefix: Some("audio/B/FS".to_string()),
            segments: SegmentList::Discrete(vec![DiscreteSegment {
                duration_secs: 180.0,
                file_name: name.to_string(),
            }]),
        }
    }

    #[test]
    fn test_cache_hit_skips_compute() {
        let cache = PlaylistCache::new(10, 3600);

        let first = cache
            .get_or_compute("key", || Ok(vec![group("a.mp3")]))
            .unwrap();
        let second = cache
            .get_or_compute("key", || panic!("must not recompute"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_error_not_cached() {
        let cache = PlaylistCache::new(10, 3600);

        let err = cache.get_or_compute("key", || {
            Err(versecast_common::Error::not_found("fileset X"))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        let ok = cache.get_or_compute("key", || Ok(vec![group("a.mp3")]));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_cache_eviction_at_capacity() {
        let cache = PlaylistCache::new(2, 3600);

        for i in 0..3 {
            cache
                .get_or_compute(&format!("key{i}"), || Ok(vec![group("a.mp3")]))
                .unwrap();
        }

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_expiry() {
        let cache = PlaylistCache::new(10, 0);

        cache
            .get_or_compute("key", || Ok(vec![group("a.mp3")]))
            .unwrap();
        // TTL of zero: the entry is already stale and must be recomputed.
        let recomputed = cache
            .get_or_compute("key", || Ok(vec![group("b.mp3")]))
            .unwrap();

        match &recomputed[0].segments {
            SegmentList::Discrete(v) => assert_eq!(v[0].file_name, "b.mp3"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_fingerprint_deterministic_and_unambiguous() {
        assert_eq!(fingerprint(&["a", "b"]), fingerprint(&["a", "b"]));
        assert_ne!(fingerprint(&["a", "b"]), fingerprint(&["ab"]));
        assert_ne!(fingerprint(&["a", "b"]), fingerprint(&["a", "c"]));
    }
}
