//! Reelstream-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across reelstream:
//!
//! - **Typed IDs**: [`VideoId`], a validated wrapper for catalog identifiers
//! - **Path Utilities**: Resolving stored video paths under a media root,
//!   and content types by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use reelstream_common::{Error, Result, VideoId};
//! use reelstream_common::paths::content_type_for_extension;
//!
//! let id: VideoId = "42".parse().unwrap();
//! assert_eq!(id.as_str(), "42");
//!
//! assert_eq!(content_type_for_extension(".mp4"), "video/mp4");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("video"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::VideoId;
