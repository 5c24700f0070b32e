//! Staging of uploaded files on local disk.
//!
//! Files are kept after analysis and a repeated filename overwrites the
//! previous upload. Only the final component of the client filename is used,
//! so nothing is written outside the upload directory.

use std::path::{Path, PathBuf};

use crate::constants::FALLBACK_UPLOAD_NAME;

/// Reduce a client-supplied filename to a bare file name.
pub fn sanitize_filename(raw: Option<&str>) -> String {
    raw.map(|name| name.replace('\\', "/").replace('\0', ""))
        .and_then(|name| {
            name.rsplit('/')
                .next()
                .map(str::trim)
                .filter(|base| !base.is_empty() && *base != "." && *base != "..")
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string())
}

/// Declared content types starting with "image" are analyzed; anything else,
/// including a missing content type, is refused.
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("image"))
}

/// Write `data` to `upload_dir`, creating the directory if needed.
pub async fn save_upload(
    upload_dir: &Path,
    filename: Option<&str>,
    data: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let full_path = upload_dir.join(sanitize_filename(filename));
    tokio::fs::write(&full_path, data).await?;
    tracing::debug!("[uploads] Saved {} bytes to {:?}", data.len(), full_path);
    Ok(full_path)
}
