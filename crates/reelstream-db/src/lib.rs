//! Reelstream-DB: Video catalog schema, migrations, and queries
//!
//! This crate provides the metadata store for reelstream using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use reelstream_db::pool::{init_pool, get_conn};
//! use reelstream_db::queries::videos;
//!
//! let pool = init_pool("/var/lib/reelstream/catalog.db", 4).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let id = "1".parse().unwrap();
//! let video = videos::create_video(&conn, &id, "intro", ".mp4", Some(1024)).unwrap();
//! println!("Registered video: {}", video.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

pub use models::VideoRecord;
