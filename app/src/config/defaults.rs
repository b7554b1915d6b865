//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("QR_LOGO_DATA_DIR", "", "Directory holding generated codes (default ~/.qr-logo)"),
    ("QR_LOGO_MODULE_SIZE", "10", "Pixels per QR module"),
    ("QR_LOGO_QUIET_ZONE", "4", "Quiet zone width in modules"),
    ("QR_LOGO_ERROR_CORRECTION", "H", "Error correction level: L, M, Q or H"),
    ("QR_LOGO_FOREGROUND", "black", "Module color"),
    ("QR_LOGO_BACKGROUND", "white", "Background color"),
    ("QR_LOGO_LOGO_SCALE", "0.2", "Logo side as a fraction of the QR width"),
    ("QR_LOGO_BORDER_WIDTH", "0", "Frame around the logo in pixels"),
    ("QR_LOGO_BORDER_COLOR", "white", "Frame color"),
    ("QR_LOGO_MAX_LOGO_DIMENSION", "4096", "Largest accepted logo side in pixels"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// All setting definitions in declaration order.
pub fn ordered_settings() -> Vec<&'static SettingDef> {
    DEFS.iter()
        .filter_map(|(key, _, _)| DEFAULT_SETTINGS.get(key))
        .collect()
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn every_non_empty_default_passes_validation() {
        for def in DEFAULT_SETTINGS.values() {
            if def.default.is_empty() {
                continue;
            }
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
        }
    }

    #[test]
    fn ordered_settings_follow_declaration_order() {
        let settings = ordered_settings();
        assert_eq!(settings.len(), DEFS.len());
        assert_eq!(settings[0].key, "QR_LOGO_DATA_DIR");
        assert!(settings.iter().all(|d| !d.description.is_empty()));
    }

    #[test]
    fn unknown_key_has_no_default() {
        assert_eq!(get_default("QR_LOGO_MODULE_SIZE"), Some("10"));
        assert_eq!(get_default("NOPE"), None);
    }
}
