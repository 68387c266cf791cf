//! Writes a planned chunk of a file as an HTTP response.
//!
//! The body is a bounded stream over the file: at most `read_buffer_size`
//! bytes are held at a time, whatever the chunk length. Once headers are
//! out, a read failure ends the body stream with an error and hyper closes
//! the connection; a dropped client drops the stream and the file handle
//! with it.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use futures::TryStreamExt;
use std::io::{self, SeekFrom};
use std::path::Path;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, ReadBuf};
use tokio_util::io::ReaderStream;

use super::chunk::ChunkPlan;
use super::error::StreamError;

/// Per-response settings that do not depend on the requested range.
#[derive(Debug, Clone)]
pub struct ResponseOptions {
    pub content_type: &'static str,
    pub read_buffer_size: usize,
    pub cache_control: Option<String>,
}

/// Open a video file and stat the opened handle.
///
/// Sizing from the open handle keeps the declared lengths consistent with
/// the bytes that handle will read.
pub async fn open_video(path: &Path) -> Result<(File, u64), StreamError> {
    let file = File::open(path)
        .await
        .map_err(|e| StreamError::file_io(path, e))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| StreamError::file_io(path, e))?;

    if !metadata.is_file() {
        return Err(StreamError::file_io(
            path,
            std::io::Error::other("not a regular file"),
        ));
    }

    Ok((file, metadata.len()))
}

/// Build the 200/206 response streaming exactly `plan.length` bytes.
pub async fn respond(
    plan: &ChunkPlan,
    mut file: File,
    path: &Path,
    options: &ResponseOptions,
) -> Result<Response, StreamError> {
    if plan.start > 0 {
        file.seek(SeekFrom::Start(plan.start))
            .await
            .map_err(|e| StreamError::file_io(path, e))?;
    }

    let body = body_from_reader(
        file,
        plan.length,
        options.read_buffer_size,
        path.display().to_string(),
    );

    let status = if plan.partial {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, options.content_type)
        .header(header::CONTENT_LENGTH, plan.length.to_string())
        .header(header::ACCEPT_RANGES, "bytes");

    if let Some(content_range) = plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }
    if let Some(cache_control) = &options.cache_control {
        builder = builder.header(header::CACHE_CONTROL, cache_control.as_str());
    }

    builder
        .body(body)
        .map_err(|e| StreamError::Response(e.to_string()))
}

/// Stream exactly `length` bytes of `reader` as a response body.
///
/// A reader that runs dry early (the file shrank after it was sized) fails
/// the stream with `UnexpectedEof` instead of ending it short of the
/// declared `Content-Length`.
fn body_from_reader<R>(reader: R, length: u64, buffer_size: usize, display_path: String) -> Body
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let reader = ExactLengthReader {
        inner: reader.take(length),
        remaining: length,
    };
    let stream = ReaderStream::with_capacity(reader, buffer_size.max(1)).inspect_err(move |e| {
        tracing::warn!(path = %display_path, error = %e, "read failed mid-stream, closing connection");
    });
    Body::from_stream(stream)
}

struct ExactLengthReader<R> {
    inner: R,
    remaining: u64,
}

impl<R: AsyncRead + Unpin> AsyncRead for ExactLengthReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.remaining == 0 || buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let before = buf.filled().len();
        ready!(Pin::new(&mut self.inner).poll_read(cx, buf))?;
        let read = (buf.filled().len() - before) as u64;

        if read == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended with {} bytes left to send", self.remaining),
            )));
        }

        self.remaining = self.remaining.saturating_sub(read);
        Poll::Ready(Ok(()))
    }
}
