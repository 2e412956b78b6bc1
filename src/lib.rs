//! # asset-prep
//!
//! Two batch tools for the images under a website's asset directory. Both
//! walk the directory recursively, pick files by extension, and rewrite them
//! in place, one at a time.
//!
//! ```text
//! bars     decode → find content box → pad → center-crop to 16:9 → same format
//! resize   backup → decode → flatten alpha → orient → fit 1200×900 → JPEG q85
//!          → drop backup (or restore it on any failure)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Recursive, case-insensitive extension filter over the source directory |
//! | [`bars`] | Black-bar removal and aspect-ratio crop |
//! | [`resize`] | Web downscaling with backup and restore |
//! | [`config`] | Stock defaults, `config.toml` merging and validation |
//! | [`imaging`] | Codec backend, box and scale math, pixel operations |
//! | [`output`] | CLI output formatting of progress events and summaries |
//!
//! # Design Decisions
//!
//! ## Content Sniffing Over Extensions
//!
//! Extensions only decide whether a file is a candidate. Decoding goes by the
//! file's magic bytes, so a PNG saved as `.jpg` is read correctly, and the
//! border remover writes it back as the PNG it really is.
//!
//! ## Never Enlarge, Always Re-encode
//!
//! The resizer's scale factor is capped at 1.0. A small-but-heavy file still
//! goes through the JPEG encoder, which is usually where the savings are.
//!
//! ## Sequential Processing
//!
//! Files are handled strictly one after another and each decoded image is
//! dropped before the next file is opened. Progress is reported through a
//! plain callback; there are no threads to coordinate.
//!
//! ## Failure Is Per File
//!
//! A file that cannot be decoded, encoded, or backed up is reported and
//! counted, and the run moves on. Only problems that affect every file (a
//! missing source directory, an invalid config, a codec that was not
//! compiled in) stop a run before it starts.

pub mod bars;
pub mod config;
pub mod imaging;
pub mod output;
pub mod resize;
pub mod scan;
