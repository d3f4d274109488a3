use anyhow::Context as _;

use crate::assets::svg_raster::rasterize_svg;
use crate::config::style::EngineOutputType;
use crate::engine::markup::build_svg;
use crate::engine::matrix::ModuleMatrix;
use crate::engine::{EngineOptions, RenderedElement, StylingEngine, VectorNode};
use crate::foundation::error::QrFrameResult;
use crate::render::surface::RenderSurface;

/// Built-in engine: dot shapes, corner styles, gradients, background and logo.
///
/// The options' output type decides the mounted element: `svg` mounts the markup, `canvas`
/// rasterizes the same markup first.
#[derive(Clone, Copy, Debug, Default)]
pub struct StyledEngine;

impl StyledEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    fn layout(options: &EngineOptions) -> QrFrameResult<RenderedElement> {
        let style = &options.style;
        let matrix = ModuleMatrix::encode(
            &options.data,
            style.qr_options.type_number,
            style.qr_options.error_correction_level,
        )?;
        let markup = build_svg(&matrix, options)?;
        match style.output {
            EngineOutputType::Svg => Ok(RenderedElement::Svg(VectorNode::new(markup))),
            EngineOutputType::Canvas => {
                let pixmap = rasterize_svg(markup.as_bytes(), options.width, options.height, None)?;
                Ok(RenderedElement::Canvas(pixmap))
            }
        }
    }
}

impl StylingEngine for StyledEngine {
    #[tracing::instrument(skip(self, options, surface), fields(w = options.width, h = options.height))]
    async fn append(&self, options: EngineOptions, surface: &mut RenderSurface) -> QrFrameResult<()> {
        options.style.validate()?;
        let element = tokio::task::spawn_blocking(move || Self::layout(&options))
            .await
            .context("join styled layout task")??;
        if let RenderedElement::Canvas(p) = &element {
            tracing::debug!(w = p.width(), h = p.height(), "mounted canvas");
        }
        surface.mount(element);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/styled.rs"]
mod tests;
