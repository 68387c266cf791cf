//! Metadata store access.
//!
//! The catalog only needs a single-row lookup by id. [`MetadataStore`] keeps
//! that seam narrow so the cache can be exercised against counting or
//! failing stores in tests, while [`SqliteMetadataStore`] is the production
//! implementation backed by the pooled SQLite catalog.

use async_trait::async_trait;
use reelstream_common::{Error, Result, VideoId};
use reelstream_db::pool::{get_conn, DbPool};
use reelstream_db::queries::videos;
use reelstream_db::VideoRecord;

/// Source of video records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up one record. `Ok(None)` means the id is not in the catalog.
    async fn lookup(&self, id: &VideoId) -> Result<Option<VideoRecord>>;
}

/// [`MetadataStore`] backed by the SQLite catalog.
///
/// Each lookup checks a connection out of the pool on the blocking thread
/// pool and returns it when the query finishes.
#[derive(Clone)]
pub struct SqliteMetadataStore {
    pool: DbPool,
}

impl SqliteMetadataStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn lookup(&self, id: &VideoId) -> Result<Option<VideoRecord>> {
        let pool = self.pool.clone();
        let id = id.clone();

        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            videos::find_video(&conn, &id)
        })
        .await
        .map_err(|e| Error::internal(format!("catalog lookup task failed: {}", e)))?
    }
}
