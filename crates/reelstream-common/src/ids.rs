//! Typed identifier for catalog videos.
//!
//! Video identifiers are opaque strings chosen by whoever registers the
//! video (the original catalog used integer keys, so `"42"` is typical).
//! Parsing rejects values that could never be a catalog key so the handler
//! can answer 404 without touching the store.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Longest identifier accepted from a request path.
pub const MAX_VIDEO_ID_LEN: usize = 128;

/// Identifier of a video in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::invalid_input("video id is empty"));
        }
        if s.len() > MAX_VIDEO_ID_LEN {
            return Err(Error::invalid_input(format!(
                "video id longer than {} bytes",
                MAX_VIDEO_ID_LEN
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(Error::invalid_input(format!("invalid video id: {:?}", s)));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
