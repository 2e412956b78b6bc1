//! Black-bar removal.
//!
//! For each image:
//!
//! ```text
//! decode → RGB → content box (any channel > threshold)
//!        → pad by 2px (clamped) → centered crop to 16:9 → overwrite
//! ```
//!
//! The file is rewritten in the format it was decoded from (JPEG at the
//! configured quality with optimized Huffman tables, PNG at best compression,
//! WebP lossless). There is no backup: the output is fully encoded in memory
//! before the original is replaced, and nothing is written on any failure.
//!
//! An image with no pixel above the threshold is reported as
//! [`BarsError::AllBlackImage`] and left alone.

use crate::config::BarsConfig;
use crate::imaging::operations::crop_to_bounds;
use crate::imaging::{
    BackendError, BoundingBox, Dimensions, EncodeParams, ImageBackend, OutputFormat, Quality,
    aspect_crop, content_bounds, pad_bounds,
};
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarsError {
    #[error("{0} appears to be entirely black")]
    AllBlackImage(PathBuf),
    #[error("Decode error: {0}")]
    Decode(#[source] BackendError),
    #[error("Encode error: {0}")]
    Encode(#[source] BackendError),
}

/// What a successful crop did to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOutcome {
    pub original: Dimensions,
    pub cropped: Dimensions,
}

/// Compute the final crop for `img`: content box, padded, then trimmed to
/// the configured aspect ratio.
///
/// Returns `None` when the image has no content pixel at all.
pub fn plan_crop(img: &RgbImage, config: &BarsConfig) -> Option<BoundingBox> {
    let (width, height) = img.dimensions();
    let content = content_bounds(img, config.threshold)?;
    let padded = pad_bounds(content, config.padding, width, height);

    let (x, y, w, h) = aspect_crop(padded.width(), padded.height(), config.aspect());
    let left = padded.left + x;
    let top = padded.top + y;

    tracing::debug!(?content, ?padded, "content bounds");
    Some(BoundingBox {
        top,
        bottom: top + h - 1,
        left,
        right: left + w - 1,
    })
}

/// Remove black bars from the image at `path` and rewrite it in place.
pub fn remove_black_bars(
    backend: &impl ImageBackend,
    path: &Path,
    config: &BarsConfig,
) -> Result<CropOutcome, BarsError> {
    let loaded = backend.load(path).map_err(BarsError::Decode)?;
    let rgb = loaded.image.to_rgb8();
    let original = Dimensions {
        width: rgb.width(),
        height: rgb.height(),
    };

    let bounds =
        plan_crop(&rgb, config).ok_or_else(|| BarsError::AllBlackImage(path.to_path_buf()))?;

    let format = OutputFormat::from_image_format(loaded.format).ok_or_else(|| {
        BarsError::Encode(BackendError::Unsupported(format!("{:?}", loaded.format)))
    })?;

    let cropped = DynamicImage::ImageRgb8(crop_to_bounds(&rgb, bounds));
    let params = EncodeParams::same_format(format, Quality::new(config.quality));
    backend
        .save(&cropped, path, &params)
        .map_err(BarsError::Encode)?;

    Ok(CropOutcome {
        original,
        cropped: Dimensions::of(&cropped),
    })
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum BarsEvent {
    Cropped { path: PathBuf, outcome: CropOutcome },
    AllBlack { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarsSummary {
    pub processed: usize,
    pub all_black: usize,
    pub failed: usize,
}

/// Process every file in `files` in order.
///
/// A failing file is reported and counted; it never stops the run.
pub fn run(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    config: &BarsConfig,
    on_event: &mut dyn FnMut(BarsEvent),
) -> BarsSummary {
    let mut summary = BarsSummary::default();

    for path in files {
        match remove_black_bars(backend, path, config) {
            Ok(outcome) => {
                summary.processed += 1;
                on_event(BarsEvent::Cropped {
                    path: path.clone(),
                    outcome,
                });
            }
            Err(BarsError::AllBlackImage(path)) => {
                tracing::warn!("{} appears to be entirely black", path.display());
                summary.all_black += 1;
                on_event(BarsEvent::AllBlack { path });
            }
            Err(err) => {
                summary.failed += 1;
                on_event(BarsEvent::Failed {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    summary
}
