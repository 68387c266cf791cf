//! Bounded in-memory cache of catalog records.
//!
//! Records are loaded lazily on first request and then served without
//! touching the store. The cache is capped at `max_entries` (the least
//! recently accessed record is evicted to make room) and optionally expires
//! records `ttl` after they were loaded.
//!
//! Concurrent misses for the same id are coalesced: the first caller takes a
//! per-key lock and queries the store, later callers wait on that lock and
//! then find the record already cached. Lookups that find nothing are never
//! cached.

use dashmap::DashMap;
use reelstream_common::{Result, VideoId};
use reelstream_db::VideoRecord;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CacheEntry {
    record: Arc<VideoRecord>,
    loaded_at: Instant,
    last_accessed: Instant,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Thread-safe cache of video records keyed by id.
pub struct VideoCache {
    entries: DashMap<VideoId, CacheEntry>,
    pending: DashMap<VideoId, Arc<Mutex<()>>>,
    max_entries: usize,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl VideoCache {
    /// Create a cache holding at most `max_entries` records.
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            pending: DashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Get a cached record, refreshing its access time.
    ///
    /// Expired records are removed and reported as absent.
    pub fn get(&self, id: &VideoId) -> Option<Arc<VideoRecord>> {
        let mut entry = self.entries.get_mut(id)?;
        if self.is_expired(&entry) {
            drop(entry);
            self.entries.remove(id);
            return None;
        }
        entry.last_accessed = Instant::now();
        Some(Arc::clone(&entry.record))
    }

    /// Insert a record, evicting the least recently used one when full.
    ///
    /// Re-inserting an existing id replaces the record (last write wins).
    pub fn insert(&self, record: VideoRecord) -> Arc<VideoRecord> {
        let id = record.id.clone();
        let record = Arc::new(record);

        if !self.entries.contains_key(&id) {
            while self.entries.len() >= self.max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let now = Instant::now();
        self.entries.insert(
            id,
            CacheEntry {
                record: Arc::clone(&record),
                loaded_at: now,
                last_accessed: now,
            },
        );
        record
    }

    /// Return the cached record for `id`, or run `load` to fetch it.
    ///
    /// `load` runs at most once per id across concurrent callers of this
    /// method; a successful result is cached, `Ok(None)` and errors are
    /// passed through uncached.
    pub async fn get_or_load<F, Fut>(&self, id: &VideoId, load: F) -> Result<Option<Arc<VideoRecord>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<VideoRecord>>>,
    {
        if let Some(record) = self.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(video_id = %id, "catalog cache hit");
            return Ok(Some(record));
        }

        let flight = PendingFlight {
            pending: &self.pending,
            id,
            lock: self
                .pending
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        };
        let _held = flight.lock.lock().await;

        // Another caller may have loaded it while we waited
        if let Some(record) = self.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(video_id = %id, "catalog cache hit after coalesced load");
            return Ok(Some(record));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(video_id = %id, "catalog cache miss");

        load().await.map(|found| found.map(|record| self.insert(record)))
    }

    /// Drop the cached record for `id`. Returns whether one was present.
    pub fn invalidate(&self, id: &VideoId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.loaded_at.elapsed() < ttl);
        before.saturating_sub(self.entries.len())
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.loaded_at.elapsed() >= ttl)
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_accessed)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => {
                self.entries.remove(&key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(video_id = %key, "evicted catalog cache entry");
                true
            }
            None => false,
        }
    }
}

/// One caller's share of a per-key load lock.
///
/// Runs on every exit from `get_or_load`, including a dropped request
/// future. The last participant out removes the pending entry; the map's own
/// reference plus ours is a count of two.
struct PendingFlight<'a> {
    pending: &'a DashMap<VideoId, Arc<Mutex<()>>>,
    id: &'a VideoId,
    lock: Arc<Mutex<()>>,
}

impl Drop for PendingFlight<'_> {
    fn drop(&mut self) {
        self.pending.remove_if(self.id, |_, pending| {
            Arc::ptr_eq(pending, &self.lock) && Arc::strong_count(pending) == 2
        });
    }
}

impl Default for VideoCache {
    fn default() -> Self {
        Self::new(10_000, None)
    }
}
