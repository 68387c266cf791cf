//! HTTP `Range` header parsing.
//!
//! Supports the single-range forms a `<video>` element sends:
//! - `bytes=500-999`
//! - `bytes=500-` (open end, filled in by the chunk planner)
//! - `bytes=-500` (last 500 bytes)
//!
//! Only the first range of a multi-range header is honored.

/// A parsed byte range, not yet capped to the chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: u64,
    /// Inclusive end offset as requested; may exceed the file size.
    pub end: Option<u64>,
}

/// What the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// No `Range` header: the whole file.
    Full,
    Partial(RangeRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("malformed Range header: {0}")]
    Malformed(String),

    #[error("range not satisfiable for a {total_size} byte file")]
    Unsatisfiable { total_size: u64 },
}

/// Parse an optional `Range` header against a file of `total_size` bytes.
pub fn parse_range_header(header: Option<&str>, total_size: u64) -> Result<ByteRange, RangeError> {
    let Some(header) = header else {
        return Ok(ByteRange::Full);
    };

    let (unit, spec) = header
        .split_once('=')
        .ok_or_else(|| malformed(header, "missing '='"))?;
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return Err(malformed(header, "unsupported range unit"));
    }

    let first = spec.split(',').next().unwrap_or_default().trim();
    let (start, end) = first
        .split_once('-')
        .ok_or_else(|| malformed(header, "missing '-'"))?;
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        // bytes=-N: the last N bytes
        if end.is_empty() {
            return Err(malformed(header, "empty range"));
        }
        let suffix_len = parse_offset(end).ok_or_else(|| malformed(header, "invalid suffix length"))?;
        if suffix_len == 0 || total_size == 0 {
            return Err(RangeError::Unsatisfiable { total_size });
        }
        return Ok(ByteRange::Partial(RangeRequest {
            start: total_size.saturating_sub(suffix_len),
            end: Some(total_size - 1),
        }));
    }

    let start = parse_offset(start).ok_or_else(|| malformed(header, "invalid start offset"))?;
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_offset(end).ok_or_else(|| malformed(header, "invalid end offset"))?)
    };

    if matches!(end, Some(end) if end < start) {
        return Err(malformed(header, "end before start"));
    }

    if start >= total_size {
        return Err(RangeError::Unsatisfiable { total_size });
    }

    Ok(ByteRange::Partial(RangeRequest { start, end }))
}

/// Digits only: `u64::from_str` would also take a leading `+`.
fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn malformed(header: &str, reason: &str) -> RangeError {
    RangeError::Malformed(format!("{} ({:?})", reason, header))
}
