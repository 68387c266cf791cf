//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory catalog, a temporary
//! media root, and a full [`AppContext`] whose store counts every lookup.
//! The [`TestHarness::with_server`] constructor starts Axum on a random port
//! for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reelstream::catalog::{MetadataStore, SqliteMetadataStore};
use reelstream::config::Config;
use reelstream::server::{create_router, AppContext};
use reelstream_common::VideoId;
use reelstream_db::pool::{init_memory_pool, DbPool};
use reelstream_db::queries::videos;
use reelstream_db::VideoRecord;

pub const MIB: u64 = 1024 * 1024;

/// SQLite store that counts lookups.
pub struct CountingStore {
    inner: SqliteMetadataStore,
    queries: AtomicUsize,
}

#[async_trait]
impl MetadataStore for CountingStore {
    async fn lookup(&self, id: &VideoId) -> reelstream_common::Result<Option<VideoRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(id).await
    }
}

pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub store: Arc<CountingStore>,
    pub media: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The media root is
    /// always replaced by the harness's temp directory.
    pub fn with_config(mut config: Config) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        config.storage.media_root = media.path().to_path_buf();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let store = Arc::new(CountingStore {
            inner: SqliteMetadataStore::new(db.clone()),
            queries: AtomicUsize::new(0),
        });
        let ctx = AppContext::with_store(config, store.clone());

        Self {
            ctx,
            db,
            store,
            media,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = create_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Write `data` to `<media>/<name>.mp4` and register it as `id`.
    pub fn add_video(&self, id: &str, name: &str, data: &[u8]) {
        std::fs::write(self.media.path().join(format!("{name}.mp4")), data)
            .expect("failed to write video");
        self.register(id, name, Some(data.len() as u64));
    }

    /// Create a zero-filled `<media>/<name>.mp4` of `size` bytes and register it.
    pub fn add_sized_video(&self, id: &str, name: &str, size: u64) {
        let file = std::fs::File::create(self.media.path().join(format!("{name}.mp4")))
            .expect("failed to create video");
        file.set_len(size).expect("failed to size video");
        self.register(id, name, Some(size));
    }

    /// Register a catalog row without creating a file.
    pub fn register(&self, id: &str, name: &str, size: Option<u64>) {
        let conn = reelstream_db::pool::get_conn(&self.db).expect("failed to get db connection");
        videos::create_video(&conn, &id.parse().unwrap(), name, ".mp4", size)
            .expect("failed to register video");
    }

    /// Number of metadata store lookups so far.
    pub fn store_queries(&self) -> usize {
        self.store.queries.load(Ordering::SeqCst)
    }
}

/// Deterministic, non-repeating-per-256 payload so offsets are checkable.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}
