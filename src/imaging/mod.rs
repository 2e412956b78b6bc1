//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from contents) |
//! | **Orientation** | `kamadak-exif` tag read + `imageops` rotate/flip |
//! | **Crop / resize** | `imageops::crop_imm`, `imageops::resize` (Lanczos3) |
//! | **Encode** | `jpeg-encoder` for JPEG, `image` codecs for the rest |
//!
//! The module is split into:
//! - **Calculations**: pure functions for box and scale math (unit testable)
//! - **Parameters**: how an image should be encoded
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: in-memory pixel transforms used by the pipelines

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, LoadedImage};
pub use calculations::{
    BoundingBox, aspect_crop, content_bounds, fit_scale, is_content_pixel, pad_bounds,
    scaled_dimensions,
};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::{DependencyMissing, RustBackend, ensure_decoders};
