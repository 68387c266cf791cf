//! Chunk planning: how many bytes a single response carries.
//!
//! Every partial response is capped at the chunk size, whatever end offset
//! the client asked for (or omitted). Clients that want more issue another
//! range request starting where this one ended.

use super::range::{ByteRange, RangeError};

/// Largest body a single 206 response carries by default (10 MiB).
pub const CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// The exact byte span one response will carry.
///
/// For partial plans `start <= end < total_size` and
/// `length == end - start + 1 <= chunk_size`. A full-file plan spans the
/// whole file; for an empty file that is the only plan with `length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub start: u64,
    pub end: u64,
    pub length: u64,
    pub total_size: u64,
    pub partial: bool,
}

impl ChunkPlan {
    /// `Content-Range` value for partial plans.
    pub fn content_range(&self) -> Option<String> {
        self.partial
            .then(|| format!("bytes {}-{}/{}", self.start, self.end, self.total_size))
    }
}

/// Plan the chunk served for `range` from a file of `total_size` bytes.
pub fn plan_chunk(range: ByteRange, total_size: u64, chunk_size: u64) -> Result<ChunkPlan, RangeError> {
    let request = match range {
        ByteRange::Full => {
            return Ok(ChunkPlan {
                start: 0,
                end: total_size.saturating_sub(1),
                length: total_size,
                total_size,
                partial: false,
            })
        }
        ByteRange::Partial(request) => request,
    };

    if request.start >= total_size {
        return Err(RangeError::Unsatisfiable { total_size });
    }

    let chunk_size = chunk_size.max(1);
    let chunk_end = request.start.saturating_add(chunk_size - 1);
    let end = request
        .end
        .unwrap_or(u64::MAX)
        .min(chunk_end)
        .min(total_size - 1);

    Ok(ChunkPlan {
        start: request.start,
        end,
        length: end - request.start + 1,
        total_size,
        partial: true,
    })
}
