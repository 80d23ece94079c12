//! SVG to PNG rasterization.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::GridError;
use crate::layout::Canvas;

/// Largest raster edge we are willing to allocate.
const MAX_DIM: u32 = 16_384;

/// Rasterize an SVG document at its native size and encode it as PNG.
///
/// A zero-area canvas produces a 1x1 transparent image.
///
/// # Errors
///
/// Returns [`GridError::Render`] if the document cannot be parsed, is too
/// large, or PNG encoding fails.
pub fn rasterize(svg: &str, canvas: Canvas) -> Result<Vec<u8>, GridError> {
    let width = to_px(canvas.width);
    let height = to_px(canvas.height);

    if width == 0 || height == 0 {
        return encode_png(&RgbaImage::new(1, 1));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(GridError::Render(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| GridError::Render(format!("Failed to parse SVG: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GridError::Render("failed to allocate pixmap".to_string()))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let img = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| GridError::Render("pixmap size mismatch".to_string()))?;

    tracing::debug!(width, height, "rasterized document");
    encode_png(&img)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.ceil() as u32
    } else {
        0
    }
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, GridError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| GridError::Render(format!("Failed to encode PNG: {e}")))?;
    Ok(buf.into_inner())
}
