use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::streaming::CHUNK_SIZE;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served at `/` (index.html fallback for unknown paths)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Origins allowed by CORS (empty = allow any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory that catalog paths are resolved against
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    /// SQLite catalog file (defaults to `reelstream.db` next to the config file)
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("video")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            database_path: None,
        }
    }
}

/// What to do with a `Range` header that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRangePolicy {
    /// Ignore the header and serve the whole file with 200
    #[default]
    Full,
    /// Answer 416 Range Not Satisfiable
    Reject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Largest body a single 206 response may carry
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Read buffer used while piping file bytes to the socket
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    #[serde(default)]
    pub malformed_range: MalformedRangePolicy,

    /// Log a warning when a full-file (200) response exceeds this many bytes
    #[serde(default = "default_full_file_warn_bytes")]
    pub full_file_warn_bytes: u64,

    /// Optional `Cache-Control` value attached to 200/206 responses
    #[serde(default)]
    pub cache_control: Option<String>,
}

fn default_chunk_size() -> u64 {
    CHUNK_SIZE
}
fn default_read_buffer_size() -> usize {
    64 * 1024
}
fn default_full_file_warn_bytes() -> u64 {
    512 * 1024 * 1024
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            read_buffer_size: default_read_buffer_size(),
            malformed_range: MalformedRangePolicy::default(),
            full_file_warn_bytes: default_full_file_warn_bytes(),
            cache_control: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum number of cached catalog records
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Drop a cached record this many seconds after it was loaded (unset = never)
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

fn default_max_entries() -> usize {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Maximum number of pooled catalog connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    reelstream_db::pool::DEFAULT_POOL_SIZE
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}
