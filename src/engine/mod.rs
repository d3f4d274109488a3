//! Styling engine seam.
//!
//! The renderer does not know how a code is drawn. It hands an [`EngineOptions`] value to a
//! [`StylingEngine`], which mounts one root element into a [`RenderSurface`]. That element may be a
//! vector document, a raster canvas, or a container wrapping either; the renderer resolves which.

use std::future::Future;
use std::sync::Arc;

use resvg::tiny_skia;

use crate::assets::logo::LogoImage;
use crate::config::style::CodeStyleConfig;
use crate::foundation::error::QrFrameResult;
use crate::render::surface::RenderSurface;

/// QR module matrix built with the `qrcode` crate.
pub mod matrix;
/// SVG markup generation for styled symbols.
pub mod markup;
/// The stock styling engine.
pub mod styled;

pub use styled::StyledEngine;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Everything an engine needs for one render pass.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Sanitized payload.
    pub data: String,
    /// Logo to embed, if any.
    pub logo: Option<Arc<LogoImage>>,
    /// Style parameters, passed through untouched.
    pub style: Arc<CodeStyleConfig>,
}

impl EngineOptions {
    /// Options for rendering `config` at `size_px x size_px`.
    pub fn for_render(config: &CodeStyleConfig, size_px: u32) -> Self {
        let style = config.with_size(size_px);
        Self {
            width: size_px,
            height: size_px,
            data: style.sanitized_data(),
            logo: style.logo.clone(),
            style: Arc::new(style),
        }
    }
}

/// A vector element as produced by an engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorNode {
    markup: String,
}

impl VectorNode {
    /// Wrap SVG markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Raw markup as mounted.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Serialize to a self-contained document: the root carries the SVG namespace.
    pub fn to_document(&self) -> String {
        let markup = self.markup.trim();
        let Some(start) = markup.find("<svg") else {
            return markup.to_string();
        };
        let tag_end = markup[start..]
            .find('>')
            .map(|i| start + i)
            .unwrap_or(markup.len());
        if markup[start..tag_end].contains("xmlns=") {
            return markup.to_string();
        }
        let insert_at = start + "<svg".len();
        format!(
            "{} xmlns=\"{SVG_NS}\"{}",
            &markup[..insert_at],
            &markup[insert_at..]
        )
    }
}

/// Element mounted into a render surface.
pub enum RenderedElement {
    /// Vector root.
    Svg(VectorNode),
    /// Raster canvas (premultiplied RGBA8).
    Canvas(tiny_skia::Pixmap),
    /// Wrapper element with children, e.g. a `div` around an `svg`.
    Container {
        /// Element name, for diagnostics.
        tag: String,
        /// Child elements in document order.
        children: Vec<RenderedElement>,
    },
}

impl RenderedElement {
    /// Build a container element.
    pub fn container(tag: impl Into<String>, children: Vec<RenderedElement>) -> Self {
        Self::Container {
            tag: tag.into(),
            children,
        }
    }

    /// Element name, lowercase.
    pub fn tag(&self) -> &str {
        match self {
            Self::Svg(_) => "svg",
            Self::Canvas(_) => "canvas",
            Self::Container { tag, .. } => tag,
        }
    }
}

impl std::fmt::Debug for RenderedElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg(node) => f
                .debug_struct("Svg")
                .field("markup_len", &node.markup().len())
                .finish(),
            Self::Canvas(p) => f
                .debug_struct("Canvas")
                .field("width", &p.width())
                .field("height", &p.height())
                .finish(),
            Self::Container { tag, children } => f
                .debug_struct("Container")
                .field("tag", tag)
                .field("children", children)
                .finish(),
        }
    }
}

/// Something that can draw a styled code into a render surface.
///
/// Implementations mount exactly one root element into `surface` and resolve once their output is
/// complete; there is no "probably finished" timing involved.
pub trait StylingEngine: Send + Sync {
    /// Lay out and mount the code described by `options`.
    fn append(
        &self,
        options: EngineOptions,
        surface: &mut RenderSurface,
    ) -> impl Future<Output = QrFrameResult<()>> + Send;
}

#[cfg(test)]
#[path = "../../tests/unit/engine/element.rs"]
mod tests;
