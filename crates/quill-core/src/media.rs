//! Post images embedded as `data:` URLs, so they live in the same storage
//! value as the post itself.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::QuillError;

/// Largest image accepted for embedding (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const FILE_TOO_LARGE: &str = "Please select an image smaller than 2MB.";
pub const INVALID_FILE_TYPE: &str = "Please select an image file.";

/// Helper to validate allowed MIME types by prefix.
pub fn validate_content_type(content_type: &str, allowed: &[&str]) -> Result<(), QuillError> {
    if !allowed.iter().any(|a| content_type.starts_with(a)) {
        return Err(QuillError::InvalidInput(INVALID_FILE_TYPE.to_string()));
    }
    Ok(())
}

/// Encode image bytes as a `data:<type>;base64,...` URL.
pub fn image_data_url(bytes: &[u8], content_type: &str) -> Result<String, QuillError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(QuillError::InvalidInput(FILE_TOO_LARGE.to_string()));
    }
    validate_content_type(content_type, &["image/"])?;

    Ok(format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)))
}

/// Read an image file and embed it, guessing the content type from the extension.
pub fn image_file_data_url(path: &Path) -> Result<String, QuillError> {
    let content_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    validate_content_type(content_type, &["image/"])?;

    let read_failed =
        |e: std::io::Error| QuillError::InvalidInput(format!("Failed to read {}: {}", path.display(), e));
    let size = std::fs::metadata(path).map_err(read_failed)?.len();
    if size > MAX_IMAGE_BYTES as u64 {
        return Err(QuillError::InvalidInput(FILE_TOO_LARGE.to_string()));
    }

    let bytes = std::fs::read(path).map_err(read_failed)?;
    image_data_url(&bytes, content_type)
}
