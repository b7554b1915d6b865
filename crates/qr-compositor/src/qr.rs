//! QR code rendering into RGBA rasters.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use qrcode::QrCode;
use tracing::debug;

use crate::color::Rgb;

/// Largest accepted raster side in pixels.
pub const MAX_QR_SIDE: u32 = 16384;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR payload is empty")]
    EmptyPayload,

    #[error("QR encode error: {0}")]
    Encode(String),
}

/// Error correction level. `H` survives the most occlusion, which is what
/// a centered logo needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for EcLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            other => Err(format!("unknown error correction level: {other}")),
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        };
        f.write_str(s)
    }
}

/// Symbol and raster parameters for [`encode_qr`].
#[derive(Debug, Clone, PartialEq)]
pub struct QrOptions {
    pub error_correction: EcLevel,
    /// Pixels per module side.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub quiet_zone: u32,
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: EcLevel::H,
            module_size: 10,
            quiet_zone: 4,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
        }
    }
}

/// Encode `data` into a square RGBA raster.
///
/// The smallest symbol version that fits the payload is chosen. The side
/// length is `(modules + 2 * quiet_zone) * module_size` and must not exceed
/// [`MAX_QR_SIDE`].
pub fn encode_qr(data: &str, opts: &QrOptions) -> Result<RgbaImage, QrError> {
    if data.is_empty() {
        return Err(QrError::EmptyPayload);
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), opts.error_correction.into())
        .map_err(|e| QrError::Encode(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let scale = opts.module_size.max(1);
    let border = opts.quiet_zone;
    let img_size = border
        .checked_mul(2)
        .and_then(|b| b.checked_add(module_count))
        .and_then(|m| m.checked_mul(scale))
        .filter(|side| *side <= MAX_QR_SIDE)
        .ok_or_else(|| {
            QrError::Encode(format!(
                "raster for {module_count} modules at {scale}px with a {border}-module \
                 quiet zone exceeds {MAX_QR_SIDE}px"
            ))
        })?;

    let dark = opts.foreground.to_rgba();
    let mut img = RgbaImage::from_pixel(img_size, img_size, opts.background.to_rgba());

    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count + border;
        let y = (i as u32) / module_count + border;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, dark);
            }
        }
    }

    debug!(
        module_count,
        module_size = scale,
        quiet_zone = border,
        ec = %opts.error_correction,
        img_size,
        "Encoded QR code"
    );
    Ok(img)
}
