//! Web resizing with backup and restore.
//!
//! For each image at least `min_size_mb` large:
//!
//! ```text
//! copy  photo.jpg → photo.backup.jpg
//! load  → flatten alpha onto white → apply EXIF orientation
//!       → scale = min(max_w / w, max_h / h, 1.0) → Lanczos3 if scale < 1
//! save  progressive JPEG (quality 85, optimized) over photo.jpg
//! ok    → delete photo.backup.jpg
//! error → move photo.backup.jpg back over photo.jpg
//! ```
//!
//! The output is always JPEG regardless of the input format; the file keeps
//! its name and extension. Images are never enlarged, but they are always
//! re-encoded.

use crate::config::ResizeConfig;
use crate::imaging::operations::{apply_orientation, flatten_onto_white, resample};
use crate::imaging::{
    BackendError, Dimensions, EncodeParams, ImageBackend, LoadedImage, Quality, fit_scale,
    scaled_dimensions,
};
use image::{DynamicImage, RgbImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Could not create backup {path}: {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Decode error: {0}")]
    Decode(#[source] BackendError),
    #[error("Encode error: {0}")]
    Encode(#[source] BackendError),
    #[error("{cause}; restoring from {} also failed: {source}", .backup.display())]
    Restore {
        cause: Box<ResizeError>,
        backup: PathBuf,
        source: std::io::Error,
    },
}

/// Dimensions before and after a successful resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebResize {
    pub original: Dimensions,
    pub output: Dimensions,
}

impl WebResize {
    pub fn was_resized(&self) -> bool {
        self.original != self.output
    }
}

/// Sibling path holding the original while it is being rewritten:
/// `photo.jpg` → `photo.backup.jpg`.
pub fn backup_path(path: &Path) -> PathBuf {
    let suffix = match path.extension() {
        Some(ext) => format!("backup.{}", ext.to_string_lossy()),
        None => "backup".to_string(),
    };
    path.with_extension(suffix)
}

/// True for names produced by [`backup_path`], e.g. `photo.backup.jpg`.
///
/// Such files may be recovery copies left by an interrupted run; they are
/// never treated as work.
pub fn is_backup_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit_once('.'))
        .is_some_and(|(_, last)| last.eq_ignore_ascii_case("backup"))
}

/// Copy `path` to `backup`, refusing to replace an existing file.
fn create_backup(path: &Path, backup: &Path) -> io::Result<()> {
    let mut source = fs::File::open(path)?;
    let mut target = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(backup)?;

    if let Err(err) = io::copy(&mut source, &mut target).and_then(|_| target.sync_all()) {
        drop(target);
        if let Err(cleanup) = fs::remove_file(backup) {
            tracing::warn!("could not remove partial backup {}: {cleanup}", backup.display());
        }
        return Err(err);
    }
    Ok(())
}

/// Size of `path` after it was rewritten, or `fallback` if it cannot be read.
fn written_size(path: &Path, fallback: u64) -> u64 {
    match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            tracing::warn!("could not read size of {}: {err}", path.display());
            fallback
        }
    }
}

/// Normalize, orient and downscale a decoded image for the web.
pub fn prepare_for_web(loaded: &LoadedImage, config: &ResizeConfig) -> (RgbImage, WebResize) {
    let rgb = flatten_onto_white(&loaded.image);
    let rgb = apply_orientation(rgb, loaded.orientation);
    let original = (rgb.width(), rgb.height());

    let scale = fit_scale(original, config.max_dimensions());
    let (pixels, output) = if scale < 1.0 {
        let (w, h) = scaled_dimensions(original, scale);
        (resample(&rgb, w, h), (w, h))
    } else {
        (rgb, original)
    };

    tracing::debug!(scale, ?original, ?output, "web resize planned");
    (
        pixels,
        WebResize {
            original: Dimensions {
                width: original.0,
                height: original.1,
            },
            output: Dimensions {
                width: output.0,
                height: output.1,
            },
        },
    )
}

fn resize_and_save(
    backend: &impl ImageBackend,
    path: &Path,
    config: &ResizeConfig,
) -> Result<WebResize, ResizeError> {
    let loaded = backend.load(path).map_err(ResizeError::Decode)?;
    let (pixels, outcome) = prepare_for_web(&loaded, config);
    drop(loaded);

    let params = EncodeParams::web_jpeg(Quality::new(config.quality));
    backend
        .save(&DynamicImage::ImageRgb8(pixels), path, &params)
        .map_err(ResizeError::Encode)?;
    Ok(outcome)
}

/// Resize the image at `path` in place, protected by a backup copy.
///
/// An existing file at the backup path is never overwritten; the image then
/// fails with [`ResizeError::Backup`] and nothing is touched. On any failure
/// after the backup exists, the original bytes are moved back before
/// returning the error.
pub fn optimize_in_place(
    backend: &impl ImageBackend,
    path: &Path,
    config: &ResizeConfig,
) -> Result<WebResize, ResizeError> {
    let backup = backup_path(path);
    create_backup(path, &backup).map_err(|source| ResizeError::Backup {
        path: backup.clone(),
        source,
    })?;
    tracing::debug!(backup = %backup.display(), "backup created");

    match resize_and_save(backend, path, config) {
        Ok(outcome) => {
            if let Err(err) = fs::remove_file(&backup) {
                tracing::warn!("could not remove backup {}: {err}", backup.display());
            }
            Ok(outcome)
        }
        Err(err) => match fs::rename(&backup, path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "original restored from backup");
                Err(err)
            }
            Err(source) => {
                tracing::warn!("restore failed, original kept at {}", backup.display());
                Err(ResizeError::Restore {
                    cause: Box::new(err),
                    backup,
                    source,
                })
            }
        },
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum ResizeEvent {
    /// Below the size threshold; never opened.
    Skipped { path: PathBuf, bytes: u64 },
    Started { path: PathBuf, bytes: u64 },
    Optimized {
        path: PathBuf,
        outcome: WebResize,
        bytes_before: u64,
        bytes_after: u64,
    },
    /// The original has been restored (or, for `Restore` errors, left at the
    /// backup path).
    Failed { path: PathBuf, error: String },
}

/// Totals for one run. Byte totals cover every recognized file; skipped and
/// failed files count with their unchanged size on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl ResizeSummary {
    pub fn bytes_saved(&self) -> i64 {
        self.bytes_before as i64 - self.bytes_after as i64
    }
}

/// Process every file in `files` in order.
///
/// A failing file is reported and counted; it never stops the run. Backup
/// files (see [`is_backup_file`]) are left out entirely.
pub fn run(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    config: &ResizeConfig,
    on_event: &mut dyn FnMut(ResizeEvent),
) -> ResizeSummary {
    let mut summary = ResizeSummary::default();
    let min_bytes = config.min_size_bytes();

    for path in files {
        if is_backup_file(path) {
            tracing::warn!("leaving backup file {} alone", path.display());
            continue;
        }

        let bytes = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                summary.failed += 1;
                on_event(ResizeEvent::Failed {
                    path: path.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        };
        summary.bytes_before += bytes;

        if bytes < min_bytes {
            summary.skipped += 1;
            summary.bytes_after += bytes;
            on_event(ResizeEvent::Skipped {
                path: path.clone(),
                bytes,
            });
            continue;
        }

        on_event(ResizeEvent::Started {
            path: path.clone(),
            bytes,
        });

        match optimize_in_place(backend, path, config) {
            Ok(outcome) => {
                let bytes_after = written_size(path, bytes);
                summary.processed += 1;
                summary.bytes_after += bytes_after;
                on_event(ResizeEvent::Optimized {
                    path: path.clone(),
                    outcome,
                    bytes_before: bytes,
                    bytes_after,
                });
            }
            Err(err) => {
                summary.failed += 1;
                summary.bytes_after += bytes;
                on_event(ResizeEvent::Failed {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    summary
}
