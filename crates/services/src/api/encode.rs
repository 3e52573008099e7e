use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;

use site_core::model::ImageUpload;

use crate::error::ApiError;

/// Base64-encodes each image on the blocking pool, keeping input order.
pub(crate) async fn encode_images(images: &[ImageUpload]) -> Result<Vec<String>, ApiError> {
    let jobs = images.iter().map(|image| {
        let bytes = image.bytes().to_vec();
        tokio::task::spawn_blocking(move || STANDARD.encode(bytes))
    });
    try_join_all(jobs)
        .await
        .map_err(|err| ApiError::Encoding(err.to_string()))
}

pub(crate) async fn encode_image(image: &ImageUpload) -> Result<String, ApiError> {
    let mut encoded = encode_images(std::slice::from_ref(image)).await?;
    encoded
        .pop()
        .ok_or_else(|| ApiError::Encoding("no output for image".into()))
}
