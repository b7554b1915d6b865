//! Logo compositing: frame a logo and paste it onto the center of a QR raster.

use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::background::remove_background;
use crate::color::Rgb;
use crate::logo::decode_logo;
use crate::options::StylingOptions;
use crate::resize::resize_square;
use crate::{CompositeError, Result};

/// Paste an optional logo onto the center of `qr`.
///
/// The input raster is never modified. Without a logo an identical copy is
/// returned. The result always has the same dimensions as `qr`: a logo
/// larger than the shorter QR side is shrunk to it and a frame that would
/// overflow is thinned until the framed block fits.
pub fn compose(qr: &RgbaImage, logo: Option<&[u8]>, opts: &StylingOptions) -> Result<RgbaImage> {
    let Some(bytes) = logo else {
        debug!("No logo supplied, returning QR raster unchanged");
        return Ok(qr.clone());
    };
    opts.check()?;

    let (qr_w, qr_h) = qr.dimensions();
    let max_side = qr_w.min(qr_h);
    if max_side == 0 {
        return Err(CompositeError::Compositing("QR raster is empty".into()));
    }

    let mut logo_size = opts.logo_size_for(qr_w);
    if logo_size > max_side {
        warn!(logo_size, max_side, "Logo larger than QR raster, clamping");
        logo_size = max_side;
    }

    let mut logo = decode_logo(bytes, logo_size, opts.max_logo_dimension)?;
    if opts.background_removal {
        remove_background(&mut logo);
    }
    let logo = resize_square(&logo, logo_size);

    let border = clamp_border(opts.border_width, logo_size, max_side);
    let block = if border > 0 {
        frame(&logo, border, opts.border_color)
    } else {
        logo
    };

    let x = (qr_w - block.width()) / 2;
    let y = (qr_h - block.height()) / 2;
    debug!(
        qr_w,
        qr_h,
        logo_size,
        border,
        x,
        y,
        "Pasting logo block onto QR raster"
    );

    let mut out = qr.clone();
    paste_with_mask(&mut out, &block, x, y);
    Ok(out)
}

/// Largest frame width that keeps the framed logo inside `max_side`.
fn clamp_border(requested: u32, logo_size: u32, max_side: u32) -> u32 {
    let max_border = max_side.saturating_sub(logo_size) / 2;
    if requested > max_border {
        warn!(requested, max_border, "Logo frame overflows QR raster, clamping");
        max_border
    } else {
        requested
    }
}

/// Surround `logo` with an opaque `border`-pixel frame of `color`.
///
/// Transparent logo pixels show the frame color through.
pub fn frame(logo: &RgbaImage, border: u32, color: Rgb) -> RgbaImage {
    let (w, h) = logo.dimensions();
    let mut framed = RgbaImage::from_pixel(w + 2 * border, h + 2 * border, color.to_rgba());
    paste_with_mask(&mut framed, logo, border, border);
    framed
}

/// Paste `top` onto `base` at `(x, y)` using `top`'s alpha as the mask.
///
/// Alpha 0 leaves the base pixel untouched and alpha 255 replaces it.
/// Anything in between mixes the colors by the mask. Parts of `top` that
/// fall outside `base` are dropped.
pub fn paste_with_mask(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x >= base.width() || target_y >= base.height() {
            continue;
        }
        match pixel[3] {
            0 => {}
            255 => base.put_pixel(target_x, target_y, *pixel),
            _ => {
                let bg = *base.get_pixel(target_x, target_y);
                base.put_pixel(target_x, target_y, blend_pixel(&bg, pixel));
            }
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let a = u32::from(fg[3]);
    let inv = 255 - a;
    let mix = |f: u8, b: u8| ((u32::from(f) * a + u32::from(b) * inv + 127) / 255) as u8;
    let coverage = u32::from(bg[3]) + (a * (255 - u32::from(bg[3])) + 127) / 255;
    Rgba([
        mix(fg[0], bg[0]),
        mix(fg[1], bg[1]),
        mix(fg[2], bg[2]),
        coverage.min(255) as u8,
    ])
}
