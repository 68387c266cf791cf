//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use reelstream_common::VideoId;
use serde::{Deserialize, Serialize};

/// A catalog entry locating one video file under the media root.
///
/// The file lives at `<media_root>/<path><extension>`. `size_bytes` is what
/// was recorded at registration time and may be absent; the streaming layer
/// always frames responses from a fresh stat of the opened file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: VideoId,
    pub path: String,
    pub extension: String,
    pub size_bytes: Option<u64>,
    pub created_at: DateTime<Utc>,
}
