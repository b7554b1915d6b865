//! QR generation pipeline: validate a request, encode, composite, persist.

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};
use qr_compositor::{CompositeError, EcLevel, QrError, QrOptions, Rgb, StylingOptions};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::AppConfig;
use crate::config::validation::{
    BORDER_WIDTH_RANGE, MODULE_SIZE_RANGE, QUIET_ZONE_RANGE, check_u32_range, validate_logo_scale,
};

use super::store::{QrStore, StoreError};

/// Logo file extensions accepted from uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "svg"];

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    UnsupportedLogo(String),
    #[error("Error generating QR code: {0}")]
    Qr(#[from] QrError),
    #[error("Error generating QR code: {0}")]
    Composite(#[from] CompositeError),
    #[error("PNG encode error: {0}")]
    Encode(String),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl GenerateError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedLogo(_) | Self::Qr(_) => true,
            Self::Composite(CompositeError::InvalidLogoFormat(_)) => true,
            Self::Composite(CompositeError::Compositing(_)) | Self::Encode(_) | Self::Store(_) => {
                false
            }
        }
    }
}

/// An uploaded logo: original file name plus raw bytes.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One generation request. `None` fields use the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub text: String,
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub error_correction: Option<EcLevel>,
    pub module_size: Option<u32>,
    pub quiet_zone: Option<u32>,
    pub logo_scale: Option<f32>,
    pub border_width: Option<u32>,
    pub border_color: Option<Rgb>,
    pub remove_background: bool,
    pub logo: Option<LogoUpload>,
}

/// Where a generated code was stored.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQr {
    pub filename: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub has_logo: bool,
}

/// Check whether a logo file name carries an allowed extension.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Run one request end to end and store the PNG in the configured output directory.
pub fn generate(config: &AppConfig, req: &GenerateRequest) -> Result<GeneratedQr, GenerateError> {
    let (qr_opts, styling) = resolve_options(config, req)?;
    let text = req.text.trim();
    let logo = req.logo.as_ref();

    if let Some(upload) = logo {
        if !allowed_file(&upload.filename) {
            return Err(GenerateError::UnsupportedLogo(
                "Unsupported file format. Allowed formats: PNG, JPG, JPEG, BMP, GIF, SVG.".into(),
            ));
        }
    }

    let qr = qr_compositor::encode_qr(text, &qr_opts)?;
    let composed = qr_compositor::compose(&qr, logo.map(|l| l.bytes.as_slice()), &styling)?;
    let png = encode_png(&composed)?;

    let filename = output_filename(text, &qr_opts, &styling, logo);
    let store = QrStore::new(config.output_dir());
    let path = if store.exists(&filename) {
        tracing::debug!(filename = %filename, "Identical QR code already stored, reusing");
        store.path_for(&filename)?
    } else {
        store.save(&filename, &png)?
    };

    tracing::info!(
        filename = %filename,
        width = composed.width(),
        has_logo = logo.is_some(),
        "QR code generated"
    );
    Ok(GeneratedQr {
        filename,
        path,
        width: composed.width(),
        height: composed.height(),
        has_logo: logo.is_some(),
    })
}

/// Merge request overrides with config defaults and validate the result.
fn resolve_options(
    config: &AppConfig,
    req: &GenerateRequest,
) -> Result<(QrOptions, StylingOptions), GenerateError> {
    if req.text.trim().is_empty() {
        return Err(GenerateError::InvalidInput(
            "Please enter text or URL to generate QR code.".into(),
        ));
    }

    let invalid = |field: &str, e: String| GenerateError::InvalidInput(format!("{field} {e}"));

    let mut qr = config.qr_options();
    if let Some(size) = req.module_size {
        check_u32_range(size, MODULE_SIZE_RANGE).map_err(|e| invalid("module size", e))?;
        qr.module_size = size;
    }
    if let Some(zone) = req.quiet_zone {
        check_u32_range(zone, QUIET_ZONE_RANGE).map_err(|e| invalid("quiet zone", e))?;
        qr.quiet_zone = zone;
    }
    if let Some(level) = req.error_correction {
        qr.error_correction = level;
    }
    if let Some(color) = req.foreground {
        qr.foreground = color;
    }
    if let Some(color) = req.background {
        qr.background = color;
    }

    let mut styling = config.styling_options();
    if let Some(scale) = req.logo_scale {
        validate_logo_scale(scale).map_err(|e| invalid("logo scale", e))?;
        styling.logo_scale = scale;
    }
    if let Some(width) = req.border_width {
        check_u32_range(width, BORDER_WIDTH_RANGE).map_err(|e| invalid("border width", e))?;
        styling.border_width = width;
    }
    if let Some(color) = req.border_color {
        styling.border_color = color;
    }
    styling.background_removal = req.remove_background;

    Ok((qr, styling))
}

/// Content-derived output name: identical requests share a file, distinct ones do not.
fn output_filename(
    text: &str,
    qr: &QrOptions,
    styling: &StylingOptions,
    logo: Option<&LogoUpload>,
) -> String {
    let mut hasher = Sha256::new();
    let mut field = |bytes: &[u8]| {
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    };

    field(text.as_bytes());
    field(qr.error_correction.to_string().as_bytes());
    field(&qr.module_size.to_le_bytes());
    field(&qr.quiet_zone.to_le_bytes());
    field(&qr.foreground.0);
    field(&qr.background.0);
    if let Some(upload) = logo {
        field(&styling.logo_scale.to_le_bytes());
        field(&styling.border_width.to_le_bytes());
        field(&styling.border_color.0);
        field(&[u8::from(styling.background_removal)]);
        field(&upload.bytes);
    }

    let digest = hasher.finalize();
    format!("qr_code_{}.png", hex::encode(&digest[..8]))
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, GenerateError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| GenerateError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn test_config(name: &str) -> AppConfig {
        let dir = std::env::temp_dir().join(format!(
            "qr-logo-generate-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        AppConfig {
            data_dir: dir,
            ..AppConfig::default()
        }
    }

    fn request(text: &str) -> GenerateRequest {
        GenerateRequest {
            text: text.into(),
            ..Default::default()
        }
    }

    fn png_logo(color: Rgba<u8>) -> LogoUpload {
        let img = RgbaImage::from_pixel(40, 40, color);
        LogoUpload {
            filename: "logo.PNG".into(),
            bytes: encode_png(&img).unwrap(),
        }
    }

    #[test]
    fn allowed_file_checks_extension_case_insensitively() {
        assert!(allowed_file("logo.png"));
        assert!(allowed_file("LOGO.JPEG"));
        assert!(allowed_file("brand.mark.svg"));
        assert!(!allowed_file("logo.tiff"));
        assert!(!allowed_file("logo"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn empty_text_is_invalid_input() {
        let config = test_config("empty");
        let err = generate(&config, &request("   ")).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
        assert!(err.is_user_error());
        assert_eq!(
            err.to_string(),
            "Please enter text or URL to generate QR code."
        );
    }

    #[test]
    fn out_of_range_options_are_invalid_input() {
        let config = test_config("ranges");
        let cases = [
            GenerateRequest {
                logo_scale: Some(1.5),
                ..request("x")
            },
            GenerateRequest {
                module_size: Some(0),
                ..request("x")
            },
            GenerateRequest {
                border_width: Some(1000),
                ..request("x")
            },
        ];
        for req in &cases {
            assert!(matches!(
                generate(&config, req),
                Err(GenerateError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn generates_plain_code_and_stores_png() {
        let config = test_config("plain");
        let out = generate(&config, &request("hello")).unwrap();

        assert_eq!((out.width, out.height), (290, 290));
        assert!(!out.has_logo);
        assert!(out.filename.starts_with("qr_code_"));
        assert_eq!(out.filename.len(), "qr_code_".len() + 16 + ".png".len());

        let stored = QrStore::new(config.output_dir()).open(&out.filename).unwrap();
        let decoded = image::load_from_memory(&stored).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (290, 290));
        let _ = std::fs::remove_dir_all(&config.data_dir);
    }

    #[test]
    fn filenames_are_content_derived() {
        let config = test_config("names");
        let a = generate(&config, &request("hello")).unwrap();
        let b = generate(&config, &request("hello")).unwrap();
        let c = generate(&config, &request("world")).unwrap();
        let d = generate(
            &config,
            &GenerateRequest {
                foreground: Some(Rgb([0, 0, 128])),
                ..request("hello")
            },
        )
        .unwrap();

        assert_eq!(a.filename, b.filename);
        assert_eq!(a.path, b.path);
        assert_eq!(std::fs::read_dir(config.output_dir()).unwrap().count(), 3);
        assert_ne!(a.filename, c.filename);
        assert_ne!(a.filename, d.filename);
        let _ = std::fs::remove_dir_all(&config.data_dir);
    }

    #[test]
    fn repeated_request_reuses_stored_file() {
        let config = test_config("reuse");
        let first = generate(&config, &request("hello")).unwrap();
        std::fs::write(&first.path, b"marker").unwrap();

        let again = generate(&config, &request("hello")).unwrap();
        assert_eq!(again.path, first.path);
        assert_eq!(std::fs::read(&again.path).unwrap(), b"marker");
        let _ = std::fs::remove_dir_all(&config.data_dir);
    }

    #[test]
    fn logo_is_composited_into_stored_png() {
        let config = test_config("logo");
        let req = GenerateRequest {
            logo: Some(png_logo(Rgba([255, 0, 0, 255]))),
            ..request("hello")
        };
        let out = generate(&config, &req).unwrap();
        assert!(out.has_logo);

        let stored = QrStore::new(config.output_dir()).open(&out.filename).unwrap();
        let decoded = image::load_from_memory(&stored).unwrap().to_rgba8();
        assert_eq!(*decoded.get_pixel(145, 145), Rgba([255, 0, 0, 255]));
        let _ = std::fs::remove_dir_all(&config.data_dir);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let config = test_config("ext");
        let mut logo = png_logo(Rgba([255, 0, 0, 255]));
        logo.filename = "logo.tiff".into();
        let req = GenerateRequest {
            logo: Some(logo),
            ..request("hello")
        };
        let err = generate(&config, &req).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedLogo(_)));
        assert!(!config.output_dir().exists());
    }

    #[test]
    fn undecodable_logo_is_a_user_error() {
        let config = test_config("garbage");
        let req = GenerateRequest {
            logo: Some(LogoUpload {
                filename: "logo.png".into(),
                bytes: b"garbage".to_vec(),
            }),
            ..request("hello")
        };
        let err = generate(&config, &req).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Composite(CompositeError::InvalidLogoFormat(_))
        ));
        assert!(err.is_user_error());
    }
}
