use image::imageops::{self, FilterType};
use resvg::tiny_skia;

use crate::assets::codec::{data_url, decode_data_url, encode_png};
use crate::assets::svg_raster::rasterize_svg;
use crate::compose::svg_tree::{SVG_NS, SvgElement, XLINK_NS};
use crate::config::frames::FrameRecord;
use crate::foundation::core::{pixmap_to_rgba_image, rgba_image_to_pixmap};
use crate::foundation::error::{QrFrameError, QrFrameResult};
use crate::render::renderer::NormalizedBitmap;

/// Which artifact kind a composite should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Flat pixel buffer.
    Raster,
    /// SVG document with the code embedded as an image.
    Vector,
}

/// Flat composite at the frame's canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterArtifact {
    /// Straight-alpha RGBA8 pixels.
    pub image: image::RgbaImage,
}

/// Frame markup plus the code as one embedded raster region.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorArtifact {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Root `<svg>` element.
    pub root: SvgElement,
}

impl VectorArtifact {
    /// The `<image>` element carrying the code.
    pub fn code_element(&self) -> Option<&SvgElement> {
        self.root.elements().filter(|e| e.name() == "image").last()
    }

    /// Decode the embedded code image back into pixels.
    pub fn decode_code_image(&self) -> QrFrameResult<image::RgbaImage> {
        let href = self
            .code_element()
            .and_then(|e| e.attr("href"))
            .ok_or_else(|| QrFrameError::serialization("vector artifact has no code image"))?;
        let (_, bytes) = decode_data_url(href)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| QrFrameError::serialization(format!("decode embedded code: {e}")))?;
        Ok(img.to_rgba8())
    }
}

/// Result of merging a code bitmap with a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum CompositeArtifact {
    /// For PNG and JPEG.
    Raster(RasterArtifact),
    /// For SVG.
    Vector(VectorArtifact),
}

impl CompositeArtifact {
    /// Kind of this artifact.
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Raster(_) => OutputKind::Raster,
            Self::Vector(_) => OutputKind::Vector,
        }
    }
}

// Root attributes that describe the old document's geometry rather than presentation.
const ROOT_GEOMETRY_ATTRS: &[&str] = &[
    "width",
    "height",
    "viewBox",
    "x",
    "y",
    "preserveAspectRatio",
    "version",
];

/// Merge `code` into `frame` at its placement rectangle.
///
/// The frame is assumed valid: catalog loading already checked that the placement fits.
#[tracing::instrument(skip(frame, code), fields(frame = %frame.id, code_px = code.size()))]
pub fn compose(
    frame: &FrameRecord,
    code: NormalizedBitmap,
    kind: OutputKind,
) -> QrFrameResult<CompositeArtifact> {
    let code = fit_code(code, frame.position.size);
    match kind {
        OutputKind::Raster => compose_raster(frame, &code).map(CompositeArtifact::Raster),
        OutputKind::Vector => compose_vector(frame, &code).map(CompositeArtifact::Vector),
    }
}

fn fit_code(code: NormalizedBitmap, size: u32) -> image::RgbaImage {
    if code.size() == size {
        return code.into_image();
    }
    tracing::debug!(from = code.size(), to = size, "rescaling code bitmap");
    imageops::resize(code.image(), size, size, FilterType::CatmullRom)
}

fn compose_raster(frame: &FrameRecord, code: &image::RgbaImage) -> QrFrameResult<RasterArtifact> {
    let mut canvas = rasterize_svg(frame.background.as_bytes(), frame.width, frame.height, None)?;
    let code = rgba_image_to_pixmap(code)?;
    let (x, y) = (frame.position.x, frame.position.y);
    canvas.draw_pixmap(
        i32::try_from(x).map_err(|_| QrFrameError::validation("placement x out of range"))?,
        i32::try_from(y).map_err(|_| QrFrameError::validation("placement y out of range"))?,
        code.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(RasterArtifact {
        image: pixmap_to_rgba_image(canvas)?,
    })
}

fn compose_vector(frame: &FrameRecord, code: &image::RgbaImage) -> QrFrameResult<VectorArtifact> {
    let background = SvgElement::parse_document(&frame.background)?;
    let (w, h) = (frame.width, frame.height);

    let mut root = SvgElement::new("svg")
        .with_attr("xmlns", SVG_NS)
        .with_attr("width", w.to_string())
        .with_attr("height", h.to_string())
        .with_attr("viewBox", format!("0 0 {w} {h}"));
    if background.uses_xlink() {
        root.set_attr("xmlns:xlink", XLINK_NS);
    }
    for (name, value) in background.attributes() {
        if !ROOT_GEOMETRY_ATTRS.contains(&name) && !name.starts_with("xmlns") {
            root.set_attr(name, value);
        }
    }
    for child in background.elements() {
        root.push_element(child.clone());
    }

    let p = frame.position;
    root.push_element(
        SvgElement::new("image")
            .with_attr("x", p.x.to_string())
            .with_attr("y", p.y.to_string())
            .with_attr("width", p.size.to_string())
            .with_attr("height", p.size.to_string())
            .with_attr("href", data_url("image/png", &encode_png(code)?)),
    );

    Ok(VectorArtifact {
        width: w,
        height: h,
        root,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
