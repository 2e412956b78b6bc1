//! CLI output formatting for both pipelines.
//!
//! Every progress event and run summary has a `format_*` function that
//! returns `Vec<String>`; `main` prints the lines as they arrive. Format
//! functions are pure, with no I/O, so the exact wording is unit tested.
//!
//! # Output Format
//!
//! ## Bars
//!
//! ```text
//! Cropped: assets/hero.jpg
//!     1920×1080 → 1600×900
//! Warning: assets/black.png appears to be entirely black
//! Failed: assets/broken.jpg
//!     Decode error: ...
//!
//! Cropped 1 image (1 entirely black, 1 failed)
//! ```
//!
//! ## Resize
//!
//! ```text
//! Optimizing images in assets (max 1200×900, quality 85)
//! Skipped: assets/icon.png (0.1 MB, already optimized)
//! Processing: assets/hero.jpg (3.2 MB)
//!     Resized from 4000×3000 to 1200×900
//!     Reduced from 3.2 MB to 0.3 MB (90.6% reduction)
//!
//! Processed 1 image (1 skipped)
//! Total: 3.3 MB → 0.4 MB, saved 2.9 MB (87.9%)
//! ```

use crate::bars::{BarsEvent, BarsSummary};
use crate::config::ResizeConfig;
use crate::resize::{ResizeEvent, ResizeSummary};
use std::path::Path;

const MB: f64 = 1024.0 * 1024.0;

/// Byte count as megabytes with one decimal.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MB)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Parenthesized tail listing the non-zero counters, or nothing.
fn counters(parts: &[(usize, &str)]) -> String {
    let shown: Vec<String> = parts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
    if shown.is_empty() {
        String::new()
    } else {
        format!(" ({})", shown.join(", "))
    }
}

// ============================================================================
// Bars
// ============================================================================

pub fn format_bars_event(event: &BarsEvent) -> Vec<String> {
    match event {
        BarsEvent::Cropped { path, outcome } => vec![
            format!("Cropped: {}", path.display()),
            format!("    {} → {}", outcome.original, outcome.cropped),
        ],
        BarsEvent::AllBlack { path } => vec![format!(
            "Warning: {} appears to be entirely black",
            path.display()
        )],
        BarsEvent::Failed { path, error } => vec![
            format!("Failed: {}", path.display()),
            format!("    {error}"),
        ],
    }
}

pub fn format_bars_summary(summary: &BarsSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Cropped {}{}",
            plural(summary.processed, "image"),
            counters(&[
                (summary.all_black, "entirely black"),
                (summary.failed, "failed"),
            ])
        ),
    ]
}

// ============================================================================
// Resize
// ============================================================================

pub fn format_resize_header(root: &Path, config: &ResizeConfig) -> Vec<String> {
    vec![format!(
        "Optimizing images in {} (max {}×{}, quality {})",
        root.display(),
        config.max_width,
        config.max_height,
        config.quality
    )]
}

/// Size change line: reduction normally, growth when re-encoding made the
/// file larger.
fn size_change(before: u64, after: u64) -> String {
    if before == 0 {
        return format!(
            "Written {} (was {})",
            format_mb(after),
            format_mb(before)
        );
    }
    let percent = (before as f64 - after as f64) / before as f64 * 100.0;
    if after <= before {
        format!(
            "Reduced from {} to {} ({:.1}% reduction)",
            format_mb(before),
            format_mb(after),
            percent
        )
    } else {
        format!(
            "Grew from {} to {} ({:.1}% larger)",
            format_mb(before),
            format_mb(after),
            -percent
        )
    }
}

pub fn format_resize_event(event: &ResizeEvent) -> Vec<String> {
    match event {
        ResizeEvent::Skipped { path, bytes } => vec![format!(
            "Skipped: {} ({}, already optimized)",
            path.display(),
            format_mb(*bytes)
        )],
        ResizeEvent::Started { path, bytes } => vec![format!(
            "Processing: {} ({})",
            path.display(),
            format_mb(*bytes)
        )],
        ResizeEvent::Optimized {
            outcome,
            bytes_before,
            bytes_after,
            ..
        } => {
            let dims = if outcome.was_resized() {
                format!("    Resized from {} to {}", outcome.original, outcome.output)
            } else {
                format!("    Image already optimal size: {}", outcome.original)
            };
            vec![dims, format!("    {}", size_change(*bytes_before, *bytes_after))]
        }
        ResizeEvent::Failed { path, error } => vec![
            format!("    Failed: {} - {error}", path.display()),
        ],
    }
}

pub fn format_resize_summary(summary: &ResizeSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Processed {}{}",
            plural(summary.processed, "image"),
            counters(&[(summary.skipped, "skipped"), (summary.failed, "failed")])
        ),
    ];

    if summary.bytes_before > 0 {
        let saved = summary.bytes_saved();
        let percent = saved as f64 / summary.bytes_before as f64 * 100.0;
        let verdict = if saved >= 0 {
            format!("saved {} ({percent:.1}%)", format_mb(saved as u64))
        } else {
            format!(
                "grew by {} ({:.1}%)",
                format_mb(saved.unsigned_abs()),
                -percent
            )
        };
        lines.push(format!(
            "Total: {} → {}, {verdict}",
            format_mb(summary.bytes_before),
            format_mb(summary.bytes_after)
        ));
    }

    lines
}

/// Print formatted lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::CropOutcome;
    use crate::imaging::Dimensions;
    use crate::resize::WebResize;
    use std::path::PathBuf;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_mb_one_decimal() {
        assert_eq!(format_mb(0), "0.0 MB");
        assert_eq!(format_mb(3 * 1024 * 1024 + 200 * 1024), "3.2 MB");
    }

    #[test]
    fn plural_singular_and_many() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(12, "image"), "12 images");
    }

    #[test]
    fn counters_hide_zeros() {
        assert_eq!(counters(&[(0, "skipped"), (0, "failed")]), "");
        assert_eq!(counters(&[(0, "skipped"), (2, "failed")]), " (2 failed)");
    }

    // =========================================================================
    // Bars
    // =========================================================================

    #[test]
    fn bars_cropped_shows_dimensions() {
        let event = BarsEvent::Cropped {
            path: PathBuf::from("assets/hero.jpg"),
            outcome: CropOutcome {
                original: dims(1920, 1200),
                cropped: dims(1920, 1080),
            },
        };
        assert_eq!(
            format_bars_event(&event),
            vec!["Cropped: assets/hero.jpg", "    1920×1200 → 1920×1080"]
        );
    }

    #[test]
    fn bars_all_black_is_a_warning() {
        let event = BarsEvent::AllBlack {
            path: PathBuf::from("dark.png"),
        };
        assert_eq!(
            format_bars_event(&event),
            vec!["Warning: dark.png appears to be entirely black"]
        );
    }

    #[test]
    fn bars_summary_lists_problems() {
        let lines = format_bars_summary(&BarsSummary {
            processed: 3,
            all_black: 1,
            failed: 0,
        });
        assert_eq!(lines[1], "Cropped 3 images (1 entirely black)");
    }

    // =========================================================================
    // Resize
    // =========================================================================

    #[test]
    fn resize_header_names_limits() {
        let lines = format_resize_header(Path::new("assets"), &ResizeConfig::default());
        assert_eq!(
            lines,
            vec!["Optimizing images in assets (max 1200×900, quality 85)"]
        );
    }

    #[test]
    fn resize_optimized_reports_reduction() {
        let event = ResizeEvent::Optimized {
            path: PathBuf::from("a.jpg"),
            outcome: WebResize {
                original: dims(3000, 1500),
                output: dims(1200, 600),
            },
            bytes_before: 4 * 1024 * 1024,
            bytes_after: 1024 * 1024,
        };
        assert_eq!(
            format_resize_event(&event),
            vec![
                "    Resized from 3000×1500 to 1200×600",
                "    Reduced from 4.0 MB to 1.0 MB (75.0% reduction)"
            ]
        );
    }

    #[test]
    fn resize_optimized_reports_growth() {
        let event = ResizeEvent::Optimized {
            path: PathBuf::from("a.png"),
            outcome: WebResize {
                original: dims(800, 600),
                output: dims(800, 600),
            },
            bytes_before: 1024 * 1024,
            bytes_after: 2 * 1024 * 1024,
        };
        let lines = format_resize_event(&event);
        assert_eq!(lines[0], "    Image already optimal size: 800×600");
        assert_eq!(lines[1], "    Grew from 1.0 MB to 2.0 MB (100.0% larger)");
    }

    #[test]
    fn resize_failed_mentions_path() {
        let event = ResizeEvent::Failed {
            path: PathBuf::from("b.jpg"),
            error: "Decode error: bad".into(),
        };
        assert_eq!(
            format_resize_event(&event),
            vec!["    Failed: b.jpg - Decode error: bad"]
        );
    }

    #[test]
    fn resize_summary_totals() {
        let lines = format_resize_summary(&ResizeSummary {
            processed: 2,
            skipped: 1,
            failed: 0,
            bytes_before: 10 * 1024 * 1024,
            bytes_after: 4 * 1024 * 1024,
        });
        assert_eq!(lines[1], "Processed 2 images (1 skipped)");
        assert_eq!(lines[2], "Total: 10.0 MB → 4.0 MB, saved 6.0 MB (60.0%)");
    }

    #[test]
    fn resize_summary_of_empty_run_has_no_total() {
        let lines = format_resize_summary(&ResizeSummary::default());
        assert_eq!(lines, vec!["", "Processed 0 images"]);
    }
}
