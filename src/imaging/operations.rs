//! Pixel-level operations shared by both pipelines.
//!
//! Everything here works on in-memory images; loading and saving belong to
//! the [`backend`](super::backend).

use super::calculations::BoundingBox;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

/// Composite any alpha channel onto opaque white and return 8-bit RGB.
///
/// Images without alpha are converted directly. Palette images arrive here
/// already expanded to RGBA by the decoder, so they take the alpha path.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend =
            |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Rotate/flip so the pixels look the way EXIF orientation `tag` says they
/// should once the tag is dropped.
///
/// 1 = normal, 2 = mirrored, 3 = 180°, 4 = flipped vertically,
/// 5 = mirrored + 90° CW, 6 = 90° CW, 7 = mirrored + 270° CW, 8 = 270° CW.
/// Unknown values are treated as 1.
pub fn apply_orientation(image: RgbImage, tag: u32) -> RgbImage {
    use image::imageops::{flip_horizontal, flip_vertical, rotate90, rotate180, rotate270};
    match tag {
        2 => flip_horizontal(&image),
        3 => rotate180(&image),
        4 => flip_vertical(&image),
        5 => flip_horizontal(&rotate90(&image)),
        6 => rotate90(&image),
        7 => flip_horizontal(&rotate270(&image)),
        8 => rotate270(&image),
        _ => image,
    }
}

/// Copy out the region described by `bounds`.
pub fn crop_to_bounds(image: &RgbImage, bounds: BoundingBox) -> RgbImage {
    crop(image, bounds.left, bounds.top, bounds.width(), bounds.height())
}

/// Copy out a `width` x `height` region starting at (`x`, `y`).
pub fn crop(image: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> RgbImage {
    image::imageops::crop_imm(image, x, y, width, height).to_image()
}

/// High-quality resample to exactly `width` x `height`.
pub fn resample(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    image::imageops::resize(image, width, height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba, RgbaImage};

    #[test]
    fn transparent_pixels_become_white() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn opaque_pixels_keep_their_color() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn half_transparent_black_is_mid_gray() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(img));
        let [r, g, b] = flat.get_pixel(0, 0).0;
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn gray_alpha_is_flattened_too() {
        let img = image::GrayAlphaImage::from_pixel(1, 1, LumaA([0, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageLumaA8(img));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn grayscale_converts_to_rgb() {
        let img = image::GrayImage::from_pixel(3, 1, image::Luma([77]));
        let flat = flatten_onto_white(&DynamicImage::ImageLuma8(img));
        assert_eq!(flat.dimensions(), (3, 1));
        assert_eq!(flat.get_pixel(2, 0), &Rgb([77, 77, 77]));
    }

    #[test]
    fn orientation_six_and_eight_swap_dimensions() {
        let img = RgbImage::new(40, 30);
        assert_eq!(apply_orientation(img.clone(), 6).dimensions(), (30, 40));
        assert_eq!(apply_orientation(img.clone(), 8).dimensions(), (30, 40));
        assert_eq!(apply_orientation(img, 3).dimensions(), (40, 30));
    }

    #[test]
    fn orientation_six_rotates_clockwise() {
        // top-left marker ends up top-right after a 90° clockwise turn
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        let rotated = apply_orientation(img, 6);
        assert_eq!(rotated.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn orientation_two_mirrors() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([9, 9, 9]));
        let mirrored = apply_orientation(img, 2);
        assert_eq!(mirrored.get_pixel(2, 0), &Rgb([9, 9, 9]));
    }

    #[test]
    fn unknown_orientation_is_identity() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        assert_eq!(apply_orientation(img.clone(), 99), img);
    }

    #[test]
    fn crop_to_bounds_takes_inclusive_box() {
        let img = RgbImage::new(10, 10);
        let out = crop_to_bounds(
            &img,
            BoundingBox {
                top: 2,
                bottom: 5,
                left: 1,
                right: 8,
            },
        );
        assert_eq!(out.dimensions(), (8, 4));
    }

    #[test]
    fn resample_hits_exact_dimensions() {
        let img = RgbImage::from_pixel(300, 150, Rgb([120, 60, 30]));
        assert_eq!(resample(&img, 120, 60).dimensions(), (120, 60));
    }
}
