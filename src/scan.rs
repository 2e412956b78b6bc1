//! Candidate discovery.
//!
//! Walks a root directory recursively and returns every file whose extension
//! (case-insensitive) belongs to the active pipeline. The full list is
//! collected before any file is touched, so files created during a run
//! (the resizer's `.backup.*` copies) are never picked up as new work.
//!
//! ```text
//! assets/
//! ├── hero.JPG             # bars + resize
//! ├── logo.png             # bars + resize
//! ├── blog/
//! │   ├── cover.webp       # bars only
//! │   └── scan.tiff        # resize only
//! └── notes.txt            # never opened
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions the border remover works on.
pub const BARS_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Extensions the web resizer works on.
pub const RESIZE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "bmp"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// True when `path` ends in one of `extensions`, ignoring ASCII case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Collect all files under `root` matching `extensions`, sorted by path.
///
/// Entries that cannot be read (permissions, races with deletion) are logged
/// and skipped rather than failing the walk.
pub fn scan(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extensions))
        .collect();

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "scan complete");
    Ok(files)
}
