use anyhow::Context as _;
use resvg::tiny_skia;

use crate::assets::svg_raster::rasterize_svg;
use crate::config::style::CodeStyleConfig;
use crate::engine::{EngineOptions, RenderedElement, StylingEngine};
use crate::foundation::core::{alloc_pixmap, is_fully_opaque, pixmap_to_rgba_image};
use crate::foundation::error::{QrFrameError, QrFrameResult};
use crate::render::generation::GenerationToken;
use crate::render::surface::SurfaceRegistry;

/// Engine output after root detection.
pub enum CodeImage {
    /// Self-contained SVG document.
    Vector(String),
    /// Raster canvas, premultiplied.
    Raster(tiny_skia::Pixmap),
}

impl CodeImage {
    /// Pick the drawable content out of a mounted root.
    ///
    /// A vector root anywhere in the subtree wins over a raster one; `None` when the subtree has
    /// neither.
    pub fn resolve(element: RenderedElement) -> Option<Self> {
        match element {
            RenderedElement::Svg(node) => Some(Self::Vector(node.to_document())),
            RenderedElement::Canvas(pixmap) => Some(Self::Raster(pixmap)),
            RenderedElement::Container { children, .. } => {
                let mut raster = None;
                for child in children {
                    match Self::resolve(child) {
                        Some(vector @ Self::Vector(_)) => return Some(vector),
                        Some(found) if raster.is_none() => raster = Some(found),
                        _ => {}
                    }
                }
                raster
            }
        }
    }

    /// Short label for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Raster(_) => "raster",
        }
    }
}

impl std::fmt::Debug for CodeImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vector(doc) => f.debug_tuple("Vector").field(&doc.len()).finish(),
            Self::Raster(p) => f
                .debug_tuple("Raster")
                .field(&(p.width(), p.height()))
                .finish(),
        }
    }
}

/// Opaque, exact-size, straight-alpha RGBA8 code image.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedBitmap {
    image: image::RgbaImage,
}

impl NormalizedBitmap {
    /// Wrap an existing square, fully opaque image.
    pub fn new(image: image::RgbaImage) -> QrFrameResult<Self> {
        if image.width() == 0 || image.width() != image.height() {
            return Err(QrFrameError::validation(format!(
                "code bitmap must be square and non-empty (got {}x{})",
                image.width(),
                image.height()
            )));
        }
        if !is_fully_opaque(image.as_raw()) {
            return Err(QrFrameError::validation("code bitmap must be fully opaque"));
        }
        Ok(Self { image })
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Pixel buffer.
    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    /// Take the pixel buffer.
    pub fn into_image(self) -> image::RgbaImage {
        self.image
    }
}

/// Turns a style config into a [`NormalizedBitmap`] whatever the engine mounts.
#[derive(Debug)]
pub struct CodeRenderer<E> {
    engine: E,
    registry: SurfaceRegistry,
}

impl<E: StylingEngine> CodeRenderer<E> {
    /// Wrap `engine` with a fresh surface registry.
    pub fn new(engine: E) -> Self {
        Self::with_registry(engine, SurfaceRegistry::new())
    }

    /// Wrap `engine`, sharing an existing registry.
    pub fn with_registry(engine: E, registry: SurfaceRegistry) -> Self {
        Self { engine, registry }
    }

    /// Registry the renderer acquires surfaces from.
    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Render `config` at `size_px x size_px`.
    pub async fn render(
        &self,
        config: &CodeStyleConfig,
        size_px: u32,
    ) -> QrFrameResult<NormalizedBitmap> {
        self.render_inner(config, size_px, None).await
    }

    /// Like [`CodeRenderer::render`], but bail out with `Superseded` as soon as `token` goes stale.
    pub async fn render_current(
        &self,
        config: &CodeStyleConfig,
        size_px: u32,
        token: &GenerationToken,
    ) -> QrFrameResult<NormalizedBitmap> {
        self.render_inner(config, size_px, Some(token)).await
    }

    #[tracing::instrument(skip(self, config, token), fields(generation = token.map(|t| t.generation())))]
    async fn render_inner(
        &self,
        config: &CodeStyleConfig,
        size_px: u32,
        token: Option<&GenerationToken>,
    ) -> QrFrameResult<NormalizedBitmap> {
        if size_px == 0 {
            return Err(QrFrameError::validation("render size must be > 0"));
        }

        let options = EngineOptions::for_render(config, size_px);
        let root = {
            let mut surface = self.registry.acquire(size_px, size_px);
            self.engine.append(options, &mut surface).await?;
            surface.take_first()
        };
        if let Some(token) = token {
            token.ensure_current()?;
        }

        let code = root.and_then(CodeImage::resolve).ok_or_else(|| {
            QrFrameError::unsupported_output("engine mounted neither a vector nor a raster root")
        })?;
        tracing::debug!(kind = code.kind_name(), "resolved engine output");

        let image = normalize(code, size_px).await?;
        if let Some(token) = token {
            token.ensure_current()?;
        }
        Ok(NormalizedBitmap { image })
    }
}

async fn normalize(code: CodeImage, size_px: u32) -> QrFrameResult<image::RgbaImage> {
    let pixmap = match code {
        CodeImage::Vector(doc) => tokio::task::spawn_blocking(move || {
            rasterize_svg(doc.as_bytes(), size_px, size_px, Some(tiny_skia::Color::WHITE))
        })
        .await
        .context("join vector decode task")??,
        CodeImage::Raster(src) => flatten_raster(&src, size_px)?,
    };
    pixmap_to_rgba_image(pixmap)
}

fn flatten_raster(src: &tiny_skia::Pixmap, size_px: u32) -> QrFrameResult<tiny_skia::Pixmap> {
    let mut out = alloc_pixmap(size_px, size_px)?;
    out.fill(tiny_skia::Color::WHITE);
    let same_size = src.width() == size_px && src.height() == size_px;
    let (transform, quality) = if same_size {
        (tiny_skia::Transform::identity(), tiny_skia::FilterQuality::Nearest)
    } else {
        tracing::debug!(
            w = src.width(),
            h = src.height(),
            size_px,
            "engine ignored the requested size, rescaling"
        );
        (
            tiny_skia::Transform::from_scale(
                size_px as f32 / src.width() as f32,
                size_px as f32 / src.height() as f32,
            ),
            tiny_skia::FilterQuality::Bicubic,
        )
    };
    let paint = tiny_skia::PixmapPaint {
        quality,
        ..tiny_skia::PixmapPaint::default()
    };
    out.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
