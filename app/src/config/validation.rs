//! Setting value validation.

use qr_compositor::{EcLevel, Rgb};

/// Accepted pixels per module.
pub const MODULE_SIZE_RANGE: (u32, u32) = (1, 50);
/// Accepted quiet zone width in modules.
pub const QUIET_ZONE_RANGE: (u32, u32) = (0, 20);
/// Accepted logo frame width in pixels.
pub const BORDER_WIDTH_RANGE: (u32, u32) = (0, 200);
/// Accepted logo side limit in pixels.
pub const MAX_LOGO_DIMENSION_RANGE: (u32, u32) = (16, 16384);

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "QR_LOGO_MODULE_SIZE" => validate_u32_range(value, MODULE_SIZE_RANGE)?,
        "QR_LOGO_QUIET_ZONE" => validate_u32_range(value, QUIET_ZONE_RANGE)?,
        "QR_LOGO_BORDER_WIDTH" => validate_u32_range(value, BORDER_WIDTH_RANGE)?,
        "QR_LOGO_MAX_LOGO_DIMENSION" => validate_u32_range(value, MAX_LOGO_DIMENSION_RANGE)?,
        "QR_LOGO_LOGO_SCALE" => {
            let v: f32 = value.parse().map_err(|_| "must be a float")?;
            validate_logo_scale(v)?;
        }
        "QR_LOGO_ERROR_CORRECTION" => {
            value.parse::<EcLevel>()?;
        }
        "QR_LOGO_FOREGROUND" | "QR_LOGO_BACKGROUND" | "QR_LOGO_BORDER_COLOR" => {
            value.parse::<Rgb>().map_err(|e| e.to_string())?;
        }
        "QR_LOGO_DATA_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Logo scale must lie in (0, 1].
pub fn validate_logo_scale(v: f32) -> Result<(), String> {
    if !(v > 0.0 && v <= 1.0) {
        return Err("must be greater than 0.0 and at most 1.0".into());
    }
    Ok(())
}

/// Check an already-parsed integer against an inclusive range.
pub fn check_u32_range(v: u32, (min, max): (u32, u32)) -> Result<(), String> {
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_u32_range(value: &str, range: (u32, u32)) -> Result<(), String> {
    let v: u32 = value.parse().map_err(|_| "must be a non-negative integer")?;
    check_u32_range(v, range)
}
