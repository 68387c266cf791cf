//! Video streaming module.
//!
//! Serves catalog videos directly with HTTP range request support.
//!
//! - [`range`] parses the `Range` header
//! - [`chunk`] caps each partial response at the chunk size
//! - [`responder`] frames the response and streams the file span
//!
//! # Routes
//!
//! - `GET /video/{id}` - Full file (200) or one capped chunk (206)

pub mod chunk;
mod direct;
mod error;
pub mod range;
pub mod responder;

pub use chunk::{plan_chunk, ChunkPlan, CHUNK_SIZE};
pub use direct::{handle, stream_video};
pub use error::StreamError;
pub use range::{parse_range_header, ByteRange, RangeError, RangeRequest};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the video streaming router.
pub fn video_router() -> Router<AppContext> {
    Router::new().route("/:video_id", get(stream_video))
}
