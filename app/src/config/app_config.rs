//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use qr_compositor::{EcLevel, QrOptions, Rgb, StylingOptions};

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration. Request-level options fall back to these values.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub module_size: u32,
    pub quiet_zone: u32,
    pub error_correction: EcLevel,
    pub foreground: Rgb,
    pub background: Rgb,
    pub logo_scale: f32,
    pub border_width: u32,
    pub border_color: Rgb,
    pub max_logo_dimension: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let qr = QrOptions::default();
        let styling = StylingOptions::default();
        Self {
            data_dir: default_data_dir(),
            module_size: qr.module_size,
            quiet_zone: qr.quiet_zone,
            error_correction: qr.error_correction,
            foreground: qr.foreground,
            background: qr.background,
            logo_scale: styling.logo_scale,
            border_width: styling.border_width,
            border_color: styling.border_color,
            max_logo_dimension: styling.max_logo_dimension,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or empty keys use their defaults. Invalid values are logged
    /// and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            match validate_setting(key, value) {
                Ok(()) => Some(value.to_string()),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring {key}={value}: {e}; using default {:?}",
                        get_default(key).unwrap_or_default()
                    );
                    None
                }
            }
        };

        let defaults = Self::default();
        Self {
            data_dir: g("QR_LOGO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            module_size: parse_or(g("QR_LOGO_MODULE_SIZE"), defaults.module_size),
            quiet_zone: parse_or(g("QR_LOGO_QUIET_ZONE"), defaults.quiet_zone),
            error_correction: parse_or(g("QR_LOGO_ERROR_CORRECTION"), defaults.error_correction),
            foreground: parse_or(g("QR_LOGO_FOREGROUND"), defaults.foreground),
            background: parse_or(g("QR_LOGO_BACKGROUND"), defaults.background),
            logo_scale: parse_or(g("QR_LOGO_LOGO_SCALE"), defaults.logo_scale),
            border_width: parse_or(g("QR_LOGO_BORDER_WIDTH"), defaults.border_width),
            border_color: parse_or(g("QR_LOGO_BORDER_COLOR"), defaults.border_color),
            max_logo_dimension: parse_or(
                g("QR_LOGO_MAX_LOGO_DIMENSION"),
                defaults.max_logo_dimension,
            ),
        }
    }

    /// Directory generated PNGs are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("qr_codes")
    }

    pub fn qr_options(&self) -> QrOptions {
        QrOptions {
            error_correction: self.error_correction,
            module_size: self.module_size,
            quiet_zone: self.quiet_zone,
            foreground: self.foreground,
            background: self.background,
        }
    }

    pub fn styling_options(&self) -> StylingOptions {
        StylingOptions {
            logo_scale: self.logo_scale,
            border_color: self.border_color,
            border_width: self.border_width,
            background_removal: false,
            max_logo_dimension: self.max_logo_dimension,
        }
    }
}

/// Data directory used when QR_LOGO_DATA_DIR is unset.
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".qr-logo")
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
