use resvg::tiny_skia;

use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Largest width or height accepted for any raster surface.
///
/// Frames are a few thousand pixels on a side; anything past this is a configuration mistake and
/// would otherwise turn into a multi-gigabyte allocation.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Allocate a transparent premultiplied RGBA8 pixmap.
pub(crate) fn alloc_pixmap(width: u32, height: u32) -> QrFrameResult<tiny_skia::Pixmap> {
    if width == 0 || height == 0 {
        return Err(QrFrameError::context_unavailable(format!(
            "surface size must be > 0 (got {width}x{height})"
        )));
    }
    if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(QrFrameError::context_unavailable(format!(
            "surface size too large: {width}x{height} (max {MAX_SURFACE_DIM}x{MAX_SURFACE_DIM})"
        )));
    }
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        QrFrameError::context_unavailable(format!("failed to allocate {width}x{height} pixmap"))
    })
}

/// Convert a premultiplied pixmap into a straight-alpha RGBA image.
pub(crate) fn pixmap_to_rgba_image(pixmap: tiny_skia::Pixmap) -> QrFrameResult<image::RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| QrFrameError::context_unavailable("pixmap byte length mismatch"))
}

/// Convert a straight-alpha RGBA image into a premultiplied pixmap.
pub(crate) fn rgba_image_to_pixmap(img: &image::RgbaImage) -> QrFrameResult<tiny_skia::Pixmap> {
    let (width, height) = img.dimensions();
    let size = tiny_skia::IntSize::from_wh(width, height).ok_or_else(|| {
        QrFrameError::context_unavailable(format!("invalid pixmap size {width}x{height}"))
    })?;
    let mut data = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut data);
    tiny_skia::Pixmap::from_vec(data, size)
        .ok_or_else(|| QrFrameError::context_unavailable("pixmap byte length mismatch"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Return `true` when every pixel of a tightly packed RGBA8 buffer has alpha 255.
pub fn is_fully_opaque(rgba: &[u8]) -> bool {
    rgba.chunks_exact(4).all(|px| px[3] == 255)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
