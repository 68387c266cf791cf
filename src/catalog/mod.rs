//! Video catalog: resolves ids to stored records.
//!
//! [`Catalog`] puts the bounded [`VideoCache`] in front of a
//! [`MetadataStore`]. After the first successful resolution of an id no
//! further store query is made for it until the record is evicted, expires,
//! or is invalidated.

mod cache;
mod store;

pub use cache::{CacheStats, VideoCache};
pub use store::{MetadataStore, SqliteMetadataStore};

use reelstream_common::{Result, VideoId};
use reelstream_db::VideoRecord;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

/// Cached front for the metadata store.
pub struct Catalog {
    store: Arc<dyn MetadataStore>,
    cache: VideoCache,
}

impl Catalog {
    pub fn new(store: Arc<dyn MetadataStore>, cache: VideoCache) -> Self {
        Self { store, cache }
    }

    /// Build a catalog whose cache is sized from configuration.
    pub fn with_config(store: Arc<dyn MetadataStore>, config: &CacheConfig) -> Self {
        let ttl = config.ttl_secs.map(Duration::from_secs);
        Self::new(store, VideoCache::new(config.max_entries, ttl))
    }

    /// Resolve an id to its record; `Ok(None)` when the catalog has no such id.
    pub async fn resolve(&self, id: &VideoId) -> Result<Option<Arc<VideoRecord>>> {
        self.cache
            .get_or_load(id, || self.store.lookup(id))
            .await
    }

    /// Forget the cached record for `id` so the next request re-reads the store.
    pub fn invalidate(&self, id: &VideoId) -> bool {
        self.cache.invalidate(id)
    }

    pub fn cache(&self) -> &VideoCache {
        &self.cache
    }
}

/// Periodically sweep expired records out of the catalog cache.
///
/// Records that expire are otherwise only dropped when requested again or
/// evicted for space.
pub fn start_cleanup_task(catalog: Arc<Catalog>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let removed = catalog.cache.cleanup_expired();
            if removed > 0 {
                tracing::debug!(removed, "swept expired catalog records");
            }
        }
    })
}
