//! Logo resizing.
//!
//! Uses Lanczos3 filtering so small logos keep smooth edges. Filtering runs
//! on premultiplied color so transparent pixels do not bleed into edges.

use image::{Rgba, RgbaImage};
use image::imageops::{self, FilterType};
use tracing::debug;

/// Resize a logo to a `size`×`size` square, ignoring its aspect ratio.
///
/// Returns a copy of the input unchanged if it already has that shape.
pub fn resize_square(img: &RgbaImage, size: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();
    let size = size.max(1);

    if orig_w == size && orig_h == size {
        debug!(size, "Logo already at target size, skipping resize");
        return img.clone();
    }

    debug!(orig_w, orig_h, size, "Resizing logo");
    let mut resized = imageops::resize(&premultiply(img), size, size, FilterType::Lanczos3);
    demultiply(&mut resized);
    resized
}

fn premultiply(img: &RgbaImage) -> RgbaImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        let a = u32::from(p[3]);
        for c in 0..3 {
            p[c] = ((u32::from(p[c]) * a + 127) / 255) as u8;
        }
    }
    out
}

fn demultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let a = u32::from(p[3]);
        if a == 0 {
            *p = Rgba([0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            p[c] = ((u32::from(p[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_logo(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
    }

    #[test]
    fn test_resize_square_downscale() {
        let result = resize_square(&create_test_logo(800, 600), 58);
        assert_eq!(result.dimensions(), (58, 58));
    }

    #[test]
    fn test_resize_square_upscale() {
        let result = resize_square(&create_test_logo(10, 20), 64);
        assert_eq!(result.dimensions(), (64, 64));
    }

    #[test]
    fn test_resize_square_same_size_is_identity() {
        let logo = create_test_logo(32, 32);
        assert_eq!(resize_square(&logo, 32), logo);
    }

    #[test]
    fn test_resize_square_preserves_solid_color() {
        let result = resize_square(&create_test_logo(100, 100), 25);
        let center = result.get_pixel(12, 12);
        assert_eq!(center[3], 255);
        assert!((i16::from(center[0]) - 200).abs() <= 1);
    }

    #[test]
    fn test_resize_square_transparent_half_keeps_edge_color() {
        let mut logo = create_test_logo(100, 100);
        for y in 0..100 {
            for x in 0..50 {
                logo.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
            for x in 50..100 {
                logo.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let result = resize_square(&logo, 58);

        let mut partial = 0;
        for pixel in result.pixels() {
            if pixel[3] == 0 {
                continue;
            }
            assert_eq!(pixel.0[..3], [255, 0, 0], "edge pixel {pixel:?} darkened");
            if pixel[3] < 255 {
                partial += 1;
            }
        }
        assert!(partial > 0, "expected anti-aliased edge pixels");
    }

    #[test]
    fn test_resize_square_zero_is_clamped() {
        let result = resize_square(&create_test_logo(5, 5), 0);
        assert_eq!(result.dimensions(), (1, 1));
    }
}
