//! Image attachments: local files embedded as `data:` URLs.

use std::{fs, io, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;

/// Default ceiling for a single attachment: 2 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("{path} is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },
}

/// Reads `path` and embeds it as `data:<mime>;base64,<payload>`.
///
/// Files larger than `max_bytes` are refused before being read.
pub fn load_image(path: &Path, max_bytes: u64) -> Result<String, ImageError> {
    let read_err = |source: io::Error| ImageError::Read {
        path: path.display().to_string(),
        source,
    };

    let size = fs::metadata(path).map_err(read_err)?.len();
    if size > max_bytes {
        return Err(ImageError::TooLarge {
            path: path.display().to_string(),
            size,
            limit: max_bytes,
        });
    }

    let bytes = fs::read(path).map_err(read_err)?;
    debug!(path = %path.display(), size, "embedded image");
    Ok(data_url(mime_type(path), &bytes))
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Mime type guessed from the file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
