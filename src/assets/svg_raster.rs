use resvg::tiny_skia;

use crate::foundation::core::alloc_pixmap;
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Parse SVG markup into a render tree.
///
/// Malformed markup maps to [`QrFrameError::Serialization`].
pub fn parse_svg(markup: &[u8]) -> QrFrameResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(markup, &opts)
        .map_err(|e| QrFrameError::serialization(format!("parse svg markup: {e}")))
}

/// Render `tree` stretched over the whole of `pixmap`.
///
/// The tree's intrinsic size is mapped onto the pixmap bounds with independent x/y scale, the same
/// way an `<img>` element stretches an SVG drawn with explicit width and height.
pub fn render_tree_into(tree: &usvg::Tree, pixmap: &mut tiny_skia::Pixmap) {
    let sx = (pixmap.width() as f32) / tree.size().width();
    let sy = (pixmap.height() as f32) / tree.size().height();
    let xform = tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(tree, xform, &mut pixmap.as_mut());
}

/// Parse and rasterize `markup` into a new `width x height` pixmap.
///
/// When `underlay` is set the pixmap is filled with that color before the SVG is drawn.
pub fn rasterize_svg(
    markup: &[u8],
    width: u32,
    height: u32,
    underlay: Option<tiny_skia::Color>,
) -> QrFrameResult<tiny_skia::Pixmap> {
    let tree = parse_svg(markup)?;
    let mut pixmap = alloc_pixmap(width, height)?;
    if let Some(color) = underlay {
        pixmap.fill(color);
    }
    render_tree_into(&tree, &mut pixmap);
    Ok(pixmap)
}

/// Pick a raster size for an SVG so that its longest side is `max_side`, keeping aspect ratio.
pub fn fit_within(tree: &usvg::Tree, max_side: u32) -> QrFrameResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(QrFrameError::serialization("svg has invalid width/height"));
    }
    let scale = (max_side as f32) / w.max(h);
    let out_w = ((w * scale).round() as u32).max(1);
    let out_h = ((h * scale).round() as u32).max(1);
    Ok((out_w, out_h))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
