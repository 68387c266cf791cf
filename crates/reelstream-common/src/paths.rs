//! Path utilities for locating stored videos.
//!
//! Catalog records store a base path relative to the media root plus a
//! separate extension (`"trailers/intro"` + `".mp4"`). These helpers join
//! the two under the root and map extensions to response content types.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve a stored `path` + `extension` pair to a file under `media_root`.
///
/// The extension is appended verbatim when it starts with a dot, otherwise a
/// dot is inserted. Stored paths must be relative and may not contain `..`
/// or root components, so a record can never point outside the media root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelstream_common::paths::resolve_media_path;
///
/// let p = resolve_media_path(Path::new("/srv/video"), "clips/intro", ".mp4").unwrap();
/// assert_eq!(p, Path::new("/srv/video/clips/intro.mp4"));
///
/// assert!(resolve_media_path(Path::new("/srv/video"), "../secret", ".mp4").is_err());
/// ```
pub fn resolve_media_path(media_root: &Path, path: &str, extension: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(Error::invalid_input("stored video path is empty"));
    }
    if extension.contains(['/', '\\']) {
        return Err(Error::invalid_input(format!(
            "invalid extension: {:?}",
            extension
        )));
    }

    let file_name = if extension.is_empty() || extension.starts_with('.') {
        format!("{}{}", path, extension)
    } else {
        format!("{}.{}", path, extension)
    };

    let relative = Path::new(&file_name);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(Error::invalid_input(format!(
                    "stored video path escapes media root: {:?}",
                    file_name
                )))
            }
        }
    }

    Ok(media_root.join(relative))
}

/// Determine the response content type from a file extension.
///
/// Accepts the extension with or without its leading dot.
///
/// # Examples
///
/// ```
/// use reelstream_common::paths::content_type_for_extension;
///
/// assert_eq!(content_type_for_extension(".mp4"), "video/mp4");
/// assert_eq!(content_type_for_extension("WEBM"), "video/webm");
/// assert_eq!(content_type_for_extension(".xyz"), "application/octet-stream");
/// ```
pub fn content_type_for_extension(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.');
    match ext.to_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "ts" | "m2ts" => "video/mp2t",
        "ogv" => "video/ogg",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
