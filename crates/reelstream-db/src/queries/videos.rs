//! Video catalog query operations.
//!
//! The streaming path only ever calls [`find_video`]; the remaining
//! operations back the CLI and tests.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use reelstream_common::{Error, Result, VideoId};

use crate::models::VideoRecord;

const VIDEO_COLUMNS: &str = "id, path, extension, size_bytes, created_at";

fn row_to_video(row: &Row<'_>) -> rusqlite::Result<VideoRecord> {
    let id: String = row.get(0)?;
    let id = id.parse::<VideoId>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let size_bytes: Option<i64> = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(VideoRecord {
        id,
        path: row.get(1)?,
        extension: row.get(2)?,
        size_bytes: size_bytes.and_then(|s| u64::try_from(s).ok()),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Register a video in the catalog.
pub fn create_video(
    conn: &Connection,
    id: &VideoId,
    path: &str,
    extension: &str,
    size_bytes: Option<u64>,
) -> Result<VideoRecord> {
    let now = Utc::now();
    let size = size_bytes
        .map(i64::try_from)
        .transpose()
        .map_err(|_| Error::invalid_input("video size does not fit in the catalog"))?;

    conn.execute(
        "INSERT INTO videos (id, path, extension, size_bytes, created_at)
         VALUES (?, ?, ?, ?, ?)",
        params![id.as_str(), path, extension, size, now.to_rfc3339()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::invalid_input(format!("video {} already exists", id))
        }
        _ => Error::database(e.to_string()),
    })?;

    Ok(VideoRecord {
        id: id.clone(),
        path: path.to_string(),
        extension: extension.to_string(),
        size_bytes,
        created_at: now,
    })
}

/// Look up a video by ID, returning `None` when no row exists.
pub fn find_video(conn: &Connection, id: &VideoId) -> Result<Option<VideoRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM videos WHERE id = ?", VIDEO_COLUMNS),
        [id.as_str()],
        row_to_video,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a video by ID.
pub fn get_video(conn: &Connection, id: &VideoId) -> Result<VideoRecord> {
    find_video(conn, id)?.ok_or_else(|| Error::not_found(format!("video {}", id)))
}

/// List all videos, oldest registration first.
pub fn list_videos(conn: &Connection) -> Result<Vec<VideoRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM videos ORDER BY created_at, id",
            VIDEO_COLUMNS
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let videos = stmt
        .query_map([], row_to_video)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(videos)
}

/// Remove a video from the catalog. Returns whether a row was deleted.
pub fn delete_video(conn: &Connection, id: &VideoId) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM videos WHERE id = ?", [id.as_str()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(deleted > 0)
}

/// Count registered videos.
pub fn count_videos(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM videos", [], |row| row.get::<_, i64>(0))
        .map(|n| n.max(0) as u64)
        .map_err(|e| Error::database(e.to_string()))
}
