//! Pure Rust codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, TIFF, BMP) | `image::ImageReader` with content sniffing |
//! | EXIF orientation | `kamadak-exif` |
//! | Encode → JPEG | `jpeg-encoder` (progressive, optimized Huffman tables) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Encode → TIFF, BMP | `DynamicImage::write_to` |
//!
//! Every encode goes to an in-memory buffer first; the target path is only
//! written once the whole file is ready.

use super::backend::{BackendError, ImageBackend, LoadedImage};
use super::params::{EncodeParams, OutputFormat};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// One or more recognized extensions have no decoder compiled in.
#[derive(Error, Debug)]
#[error(
    "no image decoder available for: {}. Rebuild asset-prep with the matching \
     `image` crate features enabled (jpeg, png, webp, tiff, bmp)",
    .extensions.join(", ")
)]
pub struct DependencyMissing {
    pub extensions: Vec<String>,
}

/// Check that every extension in `extensions` can actually be decoded.
pub fn ensure_decoders(extensions: &[&str]) -> Result<(), DependencyMissing> {
    let missing: Vec<String> = extensions
        .iter()
        .filter(|ext| {
            !ImageFormat::from_extension(ext).is_some_and(|fmt| fmt.reading_enabled())
        })
        .map(|ext| ext.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DependencyMissing {
            extensions: missing,
        })
    }
}

/// Read the EXIF orientation tag from raw file bytes.
///
/// Returns 1 (normal) when there is no EXIF block or no orientation field.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
        return 1;
    };

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Production backend built on the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_error(path: &Path, message: impl ToString) -> BackendError {
    BackendError::Encode {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

fn encode_jpeg(
    image: &DynamicImage,
    path: &Path,
    params: &EncodeParams,
) -> Result<Vec<u8>, BackendError> {
    let (width, height) = (image.width(), image.height());
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(encode_error(
            path,
            format!("{width}×{height} exceeds the JPEG size limit"),
        ));
    };

    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, params.quality.value());
    encoder.set_progressive(params.progressive);
    encoder.set_optimized_huffman_tables(params.optimize);

    let result = match image {
        DynamicImage::ImageLuma8(gray) => {
            encoder.encode(gray.as_raw(), w, h, jpeg_encoder::ColorType::Luma)
        }
        other => encoder.encode(other.to_rgb8().as_raw(), w, h, jpeg_encoder::ColorType::Rgb),
    };
    result.map_err(|e| encode_error(path, e))?;
    Ok(buf)
}

fn encode(
    image: &DynamicImage,
    path: &Path,
    params: &EncodeParams,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match params.format {
        OutputFormat::Jpeg => return encode_jpeg(image, path, params),
        OutputFormat::Png => {
            let compression = if params.optimize {
                CompressionType::Best
            } else {
                CompressionType::Default
            };
            let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilter::Adaptive);
            image.write_with_encoder(encoder)
        }
        OutputFormat::WebP => {
            // The WebP encoder only takes 8-bit RGB(A).
            let rgb_or_rgba = if image.color().has_alpha() {
                DynamicImage::ImageRgba8(image.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8())
            };
            rgb_or_rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buf))
        }
        OutputFormat::Tiff => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff),
        OutputFormat::Bmp => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp),
    };
    result.map_err(|e| encode_error(path, e))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<LoadedImage, BackendError> {
        let bytes = std::fs::read(path)?;
        let decode_error = |message: String| BackendError::Decode {
            path: path.display().to_string(),
            message,
        };

        let reader = ImageReader::new(Cursor::new(&bytes)).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| decode_error("unrecognized image format".into()))?;
        let image = reader.decode().map_err(|e| decode_error(e.to_string()))?;

        Ok(LoadedImage {
            image,
            format,
            orientation: read_exif_orientation(&bytes),
        })
    }

    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), BackendError> {
        let bytes = encode(image, path, params)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
