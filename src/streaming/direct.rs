//! Direct streaming with HTTP range requests.
//!
//! `GET /video/:id` resolves the id through the catalog, opens the file
//! under the media root and answers with the whole file (200) or one capped
//! chunk of it (206).

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Response,
};
use reelstream_common::paths::{content_type_for_extension, resolve_media_path};
use reelstream_common::VideoId;

use super::chunk::plan_chunk;
use super::error::StreamError;
use super::range::{parse_range_header, ByteRange, RangeError};
use super::responder::{open_video, respond, ResponseOptions};
use crate::config::MalformedRangePolicy;
use crate::server::AppContext;

/// Serve a catalog video with range request support.
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StreamError> {
    let range_header = match headers.get(header::RANGE) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| RangeError::Malformed("header is not visible ASCII".to_string())),
    };

    serve(&ctx, &video_id, range_header).await
}

/// Resolve, plan and stream one request.
pub async fn handle(
    ctx: &AppContext,
    video_id: &str,
    range_header: Option<&str>,
) -> Result<Response, StreamError> {
    serve(ctx, video_id, Ok(range_header)).await
}

async fn serve(
    ctx: &AppContext,
    video_id: &str,
    range_header: Result<Option<&str>, RangeError>,
) -> Result<Response, StreamError> {
    let id: VideoId = video_id
        .parse()
        .map_err(|_| StreamError::NotFound(video_id.to_string()))?;

    let record = ctx
        .catalog
        .resolve(&id)
        .await
        .map_err(StreamError::Store)?
        .ok_or_else(|| StreamError::NotFound(id.to_string()))?;

    let file_path = resolve_media_path(
        &ctx.config.storage.media_root,
        &record.path,
        &record.extension,
    )
    .map_err(|e| StreamError::InvalidRecord {
        id: id.to_string(),
        reason: e.to_string(),
    })?;

    let (file, total_size) = open_video(&file_path).await?;

    if let Some(recorded) = record.size_bytes {
        if recorded != total_size {
            tracing::debug!(
                video_id = %id,
                recorded,
                actual = total_size,
                "catalog size differs from file on disk"
            );
        }
    }

    let streaming = &ctx.config.streaming;

    let range = match range_header.and_then(|h| parse_range_header(h, total_size)) {
        Ok(range) => range,
        Err(RangeError::Malformed(reason)) => match streaming.malformed_range {
            MalformedRangePolicy::Full => {
                tracing::debug!(video_id = %id, %reason, "ignoring malformed Range header");
                ByteRange::Full
            }
            MalformedRangePolicy::Reject => {
                return Err(StreamError::RangeNotSatisfiable { total_size })
            }
        },
        Err(RangeError::Unsatisfiable { total_size }) => {
            return Err(StreamError::RangeNotSatisfiable { total_size })
        }
    };

    let plan = plan_chunk(range, total_size, streaming.chunk_size)
        .map_err(|_| StreamError::RangeNotSatisfiable { total_size })?;

    if !plan.partial && total_size > streaming.full_file_warn_bytes {
        tracing::warn!(
            video_id = %id,
            total_size,
            "serving large file without a Range header"
        );
    }

    tracing::debug!(
        video_id = %id,
        start = plan.start,
        end = plan.end,
        length = plan.length,
        total_size,
        partial = plan.partial,
        "streaming video"
    );

    let options = ResponseOptions {
        content_type: content_type_for_extension(&record.extension),
        read_buffer_size: streaming.read_buffer_size,
        cache_control: streaming.cache_control.clone(),
    };

    respond(&plan, file, &file_path, &options).await
}
