//! Failures surfaced by the video route and their HTTP mapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("video not found: {0}")]
    NotFound(String),

    #[error("range not satisfiable for a {total_size} byte file")]
    RangeNotSatisfiable { total_size: u64 },

    #[error("catalog lookup failed: {0}")]
    Store(#[source] reelstream_common::Error),

    #[error("invalid catalog record for video {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("failed to read {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build response: {0}")]
    Response(String),
}

impl StreamError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Store(_) | Self::InvalidRecord { .. } | Self::FileIo { .. } | Self::Response(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub(crate) fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::NotFound(ref id) => {
                tracing::debug!(video_id = %id, "video not found");
                (status, "Video not found").into_response()
            }
            Self::RangeNotSatisfiable { total_size } => (
                status,
                [
                    (header::CONTENT_RANGE, format!("bytes */{}", total_size)),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
            )
                .into_response(),
            err => {
                tracing::error!(error = %err, "error accessing video file");
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
