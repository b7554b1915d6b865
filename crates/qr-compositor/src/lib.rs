//! QR code rendering and logo compositing.
//!
//! Encodes text into an RGBA QR raster and pastes an optional logo onto
//! its center, either bare or wrapped in a solid-color frame.

pub mod background;
pub mod color;
pub mod compose;
pub mod logo;
pub mod options;
pub mod qr;
pub mod resize;

// Re-exports for convenience
pub use background::{ALPHA_THRESHOLD, remove_background};
pub use color::{ColorError, Rgb};
pub use compose::compose;
pub use options::StylingOptions;
pub use qr::{EcLevel, MAX_QR_SIDE, QrError, QrOptions, encode_qr};

/// Errors that can occur while compositing a logo onto a QR raster.
#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("Invalid logo format: {0}")]
    InvalidLogoFormat(String),

    #[error("Compositing error: {0}")]
    Compositing(String),
}

/// Result type alias for compositor operations.
pub type Result<T> = std::result::Result<T, CompositeError>;
