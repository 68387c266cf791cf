//! Database query modules.
//!
//! - videos: Video catalog lookups and registration

pub mod videos;
