//! Styling options for logo compositing.

use crate::color::Rgb;
use crate::{CompositeError, Result};

/// Default logo size as a fraction of the QR raster width.
pub const DEFAULT_LOGO_SCALE: f32 = 0.2;

/// Default upper bound on either side of a decoded logo, in pixels.
pub const DEFAULT_MAX_LOGO_DIMENSION: u32 = 4096;

/// How a logo is sized, framed and cleaned before being pasted.
#[derive(Debug, Clone, PartialEq)]
pub struct StylingOptions {
    /// Logo side length as a fraction of the QR width, in (0, 1].
    pub logo_scale: f32,
    /// Fill color of the frame drawn around the logo.
    pub border_color: Rgb,
    /// Frame thickness in pixels. Zero disables the frame.
    pub border_width: u32,
    /// Force pixels with alpha below [`crate::ALPHA_THRESHOLD`] to transparent.
    pub background_removal: bool,
    /// Logos wider or taller than this are rejected at decode time.
    pub max_logo_dimension: u32,
}

impl Default for StylingOptions {
    fn default() -> Self {
        Self {
            logo_scale: DEFAULT_LOGO_SCALE,
            border_color: Rgb::WHITE,
            border_width: 0,
            background_removal: false,
            max_logo_dimension: DEFAULT_MAX_LOGO_DIMENSION,
        }
    }
}

impl StylingOptions {
    /// Reject option combinations the compositor cannot honor.
    pub fn check(&self) -> Result<()> {
        if !(self.logo_scale > 0.0 && self.logo_scale <= 1.0) {
            return Err(CompositeError::Compositing(format!(
                "logo scale must be in (0, 1], got {}",
                self.logo_scale
            )));
        }
        if self.max_logo_dimension == 0 {
            return Err(CompositeError::Compositing(
                "max logo dimension must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Square logo side for a QR raster of the given width.
    pub fn logo_size_for(&self, qr_width: u32) -> u32 {
        let size = (f64::from(qr_width) * f64::from(self.logo_scale)).round() as u32;
        size.max(1)
    }
}
