//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the pipelines and the
//! codecs: load a file into pixels, and encode pixels back onto a path.
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests substitute a mock
//! to induce encode failures.

use super::params::EncodeParams;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
    #[error("Unsupported format: {0}")]
    Unsupported(String),
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// A decoded image plus what the file said about itself.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    /// Format detected from the file contents.
    pub format: ImageFormat,
    /// EXIF orientation tag (1–8), 1 when the file carries none.
    pub orientation: u32,
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Read and decode the image at `path`.
    fn load(&self, path: &Path) -> Result<LoadedImage, BackendError>;

    /// Encode `image` with `params` and write it to `path`, replacing any
    /// existing file.
    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), BackendError>;
}
