use std::fmt;

use thiserror::Error;

/// Largest accepted image, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Most images accepted in a single upload batch.
pub const MAX_IMAGES_PER_UPLOAD: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageError {
    #[error("{file_name} is not an image")]
    NotAnImage { file_name: String },

    #[error("{file_name} is larger than 10MB")]
    TooLarge { file_name: String, size: usize },

    #[error("{file_name} is empty")]
    Empty { file_name: String },
}

/// An image picked for upload, with its detected MIME type.
///
/// The MIME type comes from the file's magic bytes, not its extension.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate raw bytes as an uploadable image.
    ///
    /// # Errors
    ///
    /// Returns `ImageError` if the bytes are empty, exceed [`MAX_IMAGE_BYTES`],
    /// or are not recognized as an image format.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(ImageError::Empty { file_name });
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                file_name,
                size: bytes.len(),
            });
        }
        let mime_type = match infer::get(&bytes) {
            Some(kind) if infer::is_image(&bytes) => kind.mime_type(),
            _ => return Err(ImageError::NotAnImage { file_name }),
        };

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
