use std::path::Path;

use crate::assets::svg_raster::{fit_within, parse_svg, render_tree_into};
use crate::foundation::core::{alloc_pixmap, pixmap_to_rgba_image};
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Longest side, in pixels, that SVG logos are rasterized at.
pub const SVG_LOGO_MAX_SIDE: u32 = 512;

/// Decoded logo pixels (straight-alpha RGBA8).
#[derive(Clone, Debug, PartialEq)]
pub struct LogoImage {
    pixels: image::RgbaImage,
}

impl LogoImage {
    /// Wrap already-decoded pixels. Empty images are rejected.
    pub fn from_rgba(pixels: image::RgbaImage) -> QrFrameResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(QrFrameError::logo_fetch("logo image is empty"));
        }
        Ok(Self { pixels })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the decoded pixels.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

/// Decode logo bytes. SVG markup is rasterized, anything else goes through `image`.
pub fn decode_logo(bytes: &[u8]) -> QrFrameResult<LogoImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes).map_err(|e| QrFrameError::logo_fetch(e.to_string()))?;
        let (w, h) =
            fit_within(&tree, SVG_LOGO_MAX_SIDE).map_err(|e| QrFrameError::logo_fetch(e.to_string()))?;
        let mut pixmap = alloc_pixmap(w, h)?;
        render_tree_into(&tree, &mut pixmap);
        return LogoImage::from_rgba(pixmap_to_rgba_image(pixmap)?);
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| QrFrameError::logo_fetch(format!("decode logo image: {e}")))?;
    LogoImage::from_rgba(dyn_img.to_rgba8())
}

/// Read and decode a logo file.
pub fn load_logo(path: &Path) -> QrFrameResult<LogoImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| QrFrameError::logo_fetch(format!("read '{}': {e}", path.display())))?;
    decode_logo(&bytes)
}

/// Load a logo, degrading any failure to "no logo".
pub fn load_logo_or_none(path: &Path) -> Option<LogoImage> {
    match load_logo(path) {
        Ok(logo) => Some(logo),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "continuing without logo");
            None
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
