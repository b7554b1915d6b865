//! Color parsing for QR modules and logo frames.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use image::Rgba;
use regex::Regex;

static RE_HEX_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9A-Fa-f]{3})$").unwrap());
static RE_HEX_LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9A-Fa-f]{6})$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("Invalid color: {0} (expected a color name, #rgb or #rrggbb)")]
    Invalid(String),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Fully opaque RGBA pixel of this color.
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();

        if let Some(caps) = RE_HEX_LONG.captures(value) {
            let hex = &caps[1];
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            return match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Rgb([r, g, b])),
                _ => Err(ColorError::Invalid(s.to_string())),
            };
        }

        if let Some(caps) = RE_HEX_SHORT.captures(value) {
            let hex = &caps[1];
            // #abc expands to #aabbcc
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            return match (channel(0), channel(1), channel(2)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Rgb([r, g, b])),
                _ => Err(ColorError::Invalid(s.to_string())),
            };
        }

        named_color(&value.to_ascii_lowercase()).ok_or_else(|| ColorError::Invalid(s.to_string()))
    }
}

fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "navy" => [0, 0, 128],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "maroon" => [128, 0, 0],
        "teal" => [0, 128, 128],
        "olive" => [128, 128, 0],
        _ => return None,
    };
    Some(Rgb(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!("black".parse::<Rgb>().unwrap(), Rgb::BLACK);
        assert_eq!("White".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert_eq!(" grey ".parse::<Rgb>().unwrap(), Rgb([128, 128, 128]));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb([255, 128, 0]));
        assert_eq!("#F80".parse::<Rgb>().unwrap(), Rgb([255, 136, 0]));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!("transparent".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb([255, 128, 0]).to_string(), "#ff8000");
        assert_eq!(Rgb::WHITE.to_rgba(), Rgba([255, 255, 255, 255]));
    }
}
