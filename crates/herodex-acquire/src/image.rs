// Image acquisition.
//
// A failed image is never fatal: the caller logs the error and the
// record keeps whatever image value it already had. Failures are
// classified so callers and tests can tell a dead link from a full
// disk.

use std::fs;

use thiserror::Error;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("write failed: {0}")]
    Filesystem(#[from] std::io::Error),
}

impl ImageError {
    /// Short classification label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageError::Network(_) => "network",
            ImageError::Status(_) => "status",
            ImageError::Filesystem(_) => "filesystem",
        }
    }
}

/// Fetch an image and persist it under `storage.dir()/filename`,
/// creating the directory if absent. Returns the storage-relative path
/// that goes into the record.
pub async fn download_image(
    client: &reqwest::Client,
    url: &str,
    filename: &str,
    storage: &StorageConfig,
) -> Result<String, ImageError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status(status));
    }
    let bytes = response.bytes().await?;

    let dir = storage.dir();
    fs::create_dir_all(&dir)?;
    let path = dir.join(filename);
    fs::write(&path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved image");

    Ok(storage.relative_path(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let fs_err = ImageError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(fs_err.kind(), "filesystem");

        let status_err = ImageError::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(status_err.kind(), "status");
        assert_eq!(status_err.to_string(), "HTTP 404 Not Found");
    }
}
