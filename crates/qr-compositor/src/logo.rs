//! Logo decoding: raster formats through `image`, SVG through `resvg`.

use std::io::Cursor;

use image::{ImageError, ImageFormat, ImageReader, Limits, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::{CompositeError, Result};

/// Leading bytes inspected for the opening `<` of XML markup.
const SNIFF_LEN: usize = 4096;

/// Source format of an uploaded logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    Raster(ImageFormat),
    Svg,
}

/// Identify the logo format from its content, ignoring any file name.
pub fn sniff(bytes: &[u8]) -> Option<LogoKind> {
    if looks_like_svg(bytes) {
        return Some(LogoKind::Svg);
    }
    image::guess_format(bytes).ok().map(LogoKind::Raster)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    // Comments or a DOCTYPE may push the root element far into the file
    head.starts_with('<') && bytes.windows(4).any(|w| w == b"<svg")
}

/// Decode a logo into an RGBA raster.
///
/// Vector logos are rasterized at `target_size`×`target_size` so no
/// upscaling happens afterwards. Raster logos wider or taller than
/// `max_dimension` are refused before their pixels are allocated.
pub fn decode_logo(bytes: &[u8], target_size: u32, max_dimension: u32) -> Result<RgbaImage> {
    match sniff(bytes) {
        Some(LogoKind::Svg) => rasterize_svg(bytes, target_size.max(1)),
        Some(LogoKind::Raster(format)) => decode_raster(bytes, format, max_dimension),
        None => Err(CompositeError::InvalidLogoFormat(
            "unrecognized image data".into(),
        )),
    }
}

fn decode_raster(bytes: &[u8], format: ImageFormat, max_dimension: u32) -> Result<RgbaImage> {
    let mut reader = ImageReader::with_format(Cursor::new(bytes), format);

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    reader.limits(limits);

    let img = reader.decode().map_err(|e| match e {
        ImageError::Limits(err) => CompositeError::Compositing(format!(
            "logo exceeds {max_dimension}x{max_dimension} pixels: {err}"
        )),
        ImageError::Decoding(_) | ImageError::Unsupported(_) | ImageError::IoError(_) => {
            CompositeError::InvalidLogoFormat(e.to_string())
        }
        other => CompositeError::Compositing(other.to_string()),
    })?;

    debug!(
        ?format,
        width = img.width(),
        height = img.height(),
        "Decoded raster logo"
    );
    Ok(img.to_rgba8())
}

fn rasterize_svg(bytes: &[u8], size: u32) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| CompositeError::InvalidLogoFormat(format!("SVG parse error: {e}")))?;

    let svg_size = tree.size();
    let sx = size as f32 / svg_size.width();
    let sy = size as f32 / svg_size.height();

    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
        CompositeError::Compositing(format!("cannot allocate {size}x{size} SVG canvas"))
    })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied RGBA
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    debug!(
        svg_width = svg_size.width(),
        svg_height = svg_size.height(),
        size,
        "Rasterized SVG logo"
    );
    RgbaImage::from_raw(size, size, data)
        .ok_or_else(|| CompositeError::Compositing("SVG raster buffer size mismatch".into()))
}
