//! Pure calculation functions for crop boxes and scale factors.
//!
//! All functions here are pure and testable without any I/O or encoded files.

use image::RgbImage;

/// Inclusive rectangle inside an image.
///
/// Invariant: `top <= bottom < height` and `left <= right < width` of the
/// image it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}

/// A pixel counts as content when any single channel is brighter than
/// `threshold`. This is deliberately not a luminance test: pure blue
/// `(0, 0, 255)` is content.
pub fn is_content_pixel(pixel: &[u8; 3], threshold: u8) -> bool {
    pixel.iter().any(|&c| c > threshold)
}

/// Find the tight box around every content pixel.
///
/// Returns `None` when no pixel exceeds the threshold on any channel.
pub fn content_bounds(img: &RgbImage, threshold: u8) -> Option<BoundingBox> {
    let (width, height) = img.dimensions();
    let mut rows = vec![false; height as usize];
    let mut cols = vec![false; width as usize];

    for (x, y, pixel) in img.enumerate_pixels() {
        if is_content_pixel(&pixel.0, threshold) {
            rows[y as usize] = true;
            cols[x as usize] = true;
        }
    }

    let top = rows.iter().position(|&r| r)?;
    let bottom = rows.iter().rposition(|&r| r)?;
    let left = cols.iter().position(|&c| c)?;
    let right = cols.iter().rposition(|&c| c)?;

    Some(BoundingBox {
        top: top as u32,
        bottom: bottom as u32,
        left: left as u32,
        right: right as u32,
    })
}

/// Grow a box by `padding` on each side without leaving the image.
pub fn pad_bounds(bounds: BoundingBox, padding: u32, width: u32, height: u32) -> BoundingBox {
    BoundingBox {
        top: bounds.top.saturating_sub(padding),
        bottom: bounds.bottom.saturating_add(padding).min(height - 1),
        left: bounds.left.saturating_sub(padding),
        right: bounds.right.saturating_add(padding).min(width - 1),
    }
}

/// Centered crop of a `width` x `height` region to the `aspect` ratio.
///
/// Returns `(x, y, crop_width, crop_height)` relative to the region. Only ever
/// removes pixels: a region wider than the target loses columns on both sides,
/// a taller one loses rows top and bottom. Arithmetic is on integers so the
/// floors are exact.
///
/// # Examples
/// ```
/// # use asset_prep::imaging::aspect_crop;
/// // 1000x400 is wider than 16:9 → keep 711 columns starting at 144
/// assert_eq!(aspect_crop(1000, 400, (16, 9)), (144, 0, 711, 400));
/// ```
pub fn aspect_crop(width: u32, height: u32, aspect: (u32, u32)) -> (u32, u32, u32, u32) {
    let (aw, ah) = (u64::from(aspect.0), u64::from(aspect.1));
    let (w, h) = (u64::from(width), u64::from(height));

    match (w * ah).cmp(&(h * aw)) {
        std::cmp::Ordering::Greater => {
            // too wide
            let new_width = ((h * aw) / ah).clamp(1, w) as u32;
            ((width - new_width) / 2, 0, new_width, height)
        }
        std::cmp::Ordering::Less => {
            // too tall
            let new_height = ((w * ah) / aw).clamp(1, h) as u32;
            (0, (height - new_height) / 2, width, new_height)
        }
        std::cmp::Ordering::Equal => (0, 0, width, height),
    }
}

/// Downscale factor that fits `original` inside `max`, never above 1.0.
pub fn fit_scale(original: (u32, u32), max: (u32, u32)) -> f64 {
    let width_ratio = f64::from(max.0) / f64::from(original.0);
    let height_ratio = f64::from(max.1) / f64::from(original.1);
    width_ratio.min(height_ratio).min(1.0)
}

/// Target dimensions after applying `scale`, floored, at least 1x1.
pub fn scaled_dimensions(original: (u32, u32), scale: f64) -> (u32, u32) {
    // epsilon keeps `w * (max / w)` from flooring to `max - 1`
    let w = (f64::from(original.0) * scale + 1e-9).floor() as u32;
    let h = (f64::from(original.1) * scale + 1e-9).floor() as u32;
    (w.max(1), h.max(1))
}
