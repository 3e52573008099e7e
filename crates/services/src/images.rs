use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::debug;

use site_core::model::ImageUpload;

use crate::error::ImageLoadError;

/// Reads one picked file and checks that it is an acceptable image.
///
/// # Errors
///
/// Returns `ImageLoadError` when the file cannot be read or is not an image
/// within the size limit.
pub async fn load_image(path: &Path) -> Result<ImageUpload, ImageLoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    debug!(file = %file_name, bytes = bytes.len(), "loaded image");
    Ok(ImageUpload::new(file_name, bytes)?)
}

/// Reads all files concurrently. Fails on the first unreadable or rejected file.
///
/// # Errors
///
/// Returns the first `ImageLoadError` encountered.
pub async fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageUpload>, ImageLoadError> {
    try_join_all(paths.iter().map(|path| load_image(path))).await
}
