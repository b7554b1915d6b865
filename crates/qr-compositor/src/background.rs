//! Alpha-threshold background cleanup for logos.
//!
//! Only the alpha channel is inspected: stray near-transparent edge pixels
//! become fully transparent white. Color is never used as a key.

use image::{Rgba, RgbaImage};
use tracing::debug;

/// Pixels with alpha strictly below this value are cleared.
pub const ALPHA_THRESHOLD: u8 = 100;

const CLEARED: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Clear every pixel whose alpha is below [`ALPHA_THRESHOLD`] in place.
///
/// Returns the number of pixels that changed. Applying it twice is the
/// same as applying it once.
pub fn remove_background(img: &mut RgbaImage) -> usize {
    let mut cleared = 0usize;
    for pixel in img.pixels_mut() {
        if pixel[3] < ALPHA_THRESHOLD && *pixel != CLEARED {
            *pixel = CLEARED;
            cleared += 1;
        }
    }
    debug!(
        width = img.width(),
        height = img.height(),
        cleared,
        "Removed near-transparent background pixels"
    );
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_logo() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(4, 1, Rgba([10, 20, 30, 255]));
        img.put_pixel(0, 0, Rgba([200, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 200, 0, 99]));
        img.put_pixel(2, 0, Rgba([0, 0, 200, 100]));
        img
    }

    #[test]
    fn clears_only_pixels_below_threshold() {
        let mut img = sample_logo();
        let cleared = remove_background(&mut img);
        assert_eq!(cleared, 2);
        assert_eq!(*img.get_pixel(0, 0), CLEARED);
        assert_eq!(*img.get_pixel(1, 0), CLEARED);
        // Exactly at the threshold passes through
        assert_eq!(*img.get_pixel(2, 0), Rgba([0, 0, 200, 100]));
        assert_eq!(*img.get_pixel(3, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn ignores_color_of_opaque_pixels() {
        // A white opaque "background" is kept: only alpha matters
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        assert_eq!(remove_background(&mut img), 0);
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn is_idempotent() {
        let mut once = sample_logo();
        remove_background(&mut once);
        let mut twice = once.clone();
        assert_eq!(remove_background(&mut twice), 0);
        assert_eq!(once, twice);
    }
}
