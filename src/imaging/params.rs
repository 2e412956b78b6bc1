//! Encoding parameters for writing images back to disk.
//!
//! These describe *how* an image is encoded, not which pixels it holds. The
//! pipelines pick the parameters; the [`backend`](super::backend) honours them.
//!
//! - [`Quality`] — lossy encoding quality (1–100). Clamped on construction.
//! - [`OutputFormat`] — target container/codec.
//! - [`EncodeParams`] — format + quality + progressive/optimize switches.

use image::ImageFormat;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Formats the backend knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Bmp,
}

impl OutputFormat {
    /// Map a decoded format onto a writable one, if supported.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            ImageFormat::Tiff => Some(Self::Tiff),
            ImageFormat::Bmp => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Full description of an encode.
///
/// `quality` only affects JPEG. `progressive` is ignored by every other
/// format. `optimize` selects optimized Huffman tables for JPEG and the
/// strongest compression level for PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
    pub progressive: bool,
    pub optimize: bool,
}

impl EncodeParams {
    /// Re-save in the image's own format, optimized, baseline.
    pub fn same_format(format: OutputFormat, quality: Quality) -> Self {
        Self {
            format,
            quality,
            progressive: false,
            optimize: true,
        }
    }

    /// Progressive, optimized JPEG for serving on the web.
    pub fn web_jpeg(quality: Quality) -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality,
            progressive: true,
            optimize: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(95).value(), 95);
        assert_eq!(Quality::new(200).value(), 100);
    }

    #[test]
    fn web_jpeg_is_progressive_and_optimized() {
        let params = EncodeParams::web_jpeg(Quality::new(85));
        assert_eq!(params.format, OutputFormat::Jpeg);
        assert!(params.progressive);
        assert!(params.optimize);
        assert_eq!(params.quality.value(), 85);
    }

    #[test]
    fn same_format_is_baseline() {
        let params = EncodeParams::same_format(OutputFormat::Png, Quality::new(95));
        assert_eq!(params.format, OutputFormat::Png);
        assert!(!params.progressive);
        assert!(params.optimize);
    }

    #[test]
    fn unsupported_formats_have_no_output_mapping() {
        assert_eq!(
            OutputFormat::from_image_format(ImageFormat::Jpeg),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(OutputFormat::from_image_format(ImageFormat::Gif), None);
    }
}
