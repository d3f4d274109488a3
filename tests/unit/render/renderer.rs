use super::*;
use crate::config::style::EngineOutputType;
use crate::engine::{StyledEngine, VectorNode};
use crate::foundation::core::is_fully_opaque;
use crate::render::generation::GenerationCounter;
use crate::render::surface::RenderSurface;

struct MountEngine<F>(F);

impl<F> StylingEngine for MountEngine<F>
where
    F: Fn(u32) -> Option<RenderedElement> + Send + Sync,
{
    async fn append(&self, options: EngineOptions, surface: &mut RenderSurface) -> QrFrameResult<()> {
        if let Some(element) = (self.0)(options.width) {
            surface.mount(element);
        }
        Ok(())
    }
}

struct FailingEngine;

impl StylingEngine for FailingEngine {
    async fn append(&self, _options: EngineOptions, surface: &mut RenderSurface) -> QrFrameResult<()> {
        surface.mount(RenderedElement::Svg(VectorNode::new("<svg/>")));
        Err(QrFrameError::engine("payload rejected"))
    }
}

const RED_SQUARE: &str =
    r##"<svg width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

fn config() -> CodeStyleConfig {
    CodeStyleConfig::default().with_data("https://example.com")
}

#[tokio::test]
async fn stock_engine_renders_exact_size_opaque_and_repeatable() {
    let renderer = CodeRenderer::new(StyledEngine::new());
    for size in [64, 300, 333] {
        let a = renderer.render(&config(), size).await.unwrap();
        assert_eq!(a.image().dimensions(), (size, size));
        assert!(is_fully_opaque(a.image().as_raw()));
        let b = renderer.render(&config(), size).await.unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(renderer.registry().live(), 0);
}

#[tokio::test]
async fn canvas_output_and_transparent_background_are_flattened() {
    let renderer = CodeRenderer::new(StyledEngine::new());
    let mut cfg = config().with_output(EngineOutputType::Canvas);
    cfg.background_options.color = "transparent".to_string();
    cfg.margin = 20;
    let bitmap = renderer.render(&cfg, 200).await.unwrap();
    assert_eq!(bitmap.size(), 200);
    assert!(is_fully_opaque(bitmap.image().as_raw()));
    // Inside the quiet margin nothing is drawn, so only the white flattening shows.
    assert_eq!(bitmap.image().get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(bitmap.image().get_pixel(10, 190).0, [255, 255, 255, 255]);
}

#[tokio::test]
async fn nested_vector_root_is_found_inside_container() {
    let renderer = CodeRenderer::new(MountEngine(|_: u32| {
        Some(RenderedElement::container(
            "div",
            vec![
                RenderedElement::container("span", vec![]),
                RenderedElement::Svg(VectorNode::new(RED_SQUARE)),
            ],
        ))
    }));
    let bitmap = renderer.render(&config(), 40).await.unwrap();
    assert_eq!(bitmap.image().get_pixel(20, 20).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn vector_wins_over_canvas_sibling() {
    let renderer = CodeRenderer::new(MountEngine(|size: u32| {
        let blank = tiny_skia::Pixmap::new(size, size)?;
        Some(RenderedElement::container(
            "div",
            vec![
                RenderedElement::Canvas(blank),
                RenderedElement::Svg(VectorNode::new(RED_SQUARE)),
            ],
        ))
    }));
    let bitmap = renderer.render(&config(), 16).await.unwrap();
    assert_eq!(bitmap.image().get_pixel(8, 8).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn mis_sized_translucent_canvas_is_rescaled_over_white() {
    let renderer = CodeRenderer::new(MountEngine(|_: u32| {
        let mut p = tiny_skia::Pixmap::new(10, 10)?;
        p.fill(tiny_skia::Color::from_rgba8(0, 0, 0, 128));
        Some(RenderedElement::Canvas(p))
    }));
    let bitmap = renderer.render(&config(), 40).await.unwrap();
    assert_eq!(bitmap.image().dimensions(), (40, 40));
    assert!(is_fully_opaque(bitmap.image().as_raw()));
}

#[tokio::test]
async fn unsupported_root_fails_and_releases_surface() {
    let renderer =
        CodeRenderer::new(MountEngine(|_: u32| Some(RenderedElement::container("div", vec![]))));
    let err = renderer.render(&config(), 32).await.unwrap_err();
    assert!(matches!(err, QrFrameError::UnsupportedRenderOutput(_)));
    assert_eq!(renderer.registry().live(), 0);

    let empty = CodeRenderer::new(MountEngine(|_: u32| None::<RenderedElement>));
    let err = empty.render(&config(), 32).await.unwrap_err();
    assert!(matches!(err, QrFrameError::UnsupportedRenderOutput(_)));
}

#[tokio::test]
async fn engine_failure_releases_surface() {
    let renderer = CodeRenderer::new(FailingEngine);
    let err = renderer.render(&config(), 32).await.unwrap_err();
    assert!(matches!(err, QrFrameError::Engine(_)));
    assert_eq!(renderer.registry().live(), 0);
    assert_eq!(renderer.registry().acquired_total(), 1);
}

#[tokio::test]
async fn zero_size_is_rejected_without_a_surface() {
    let renderer = CodeRenderer::new(StyledEngine::new());
    let err = renderer.render(&config(), 0).await.unwrap_err();
    assert!(matches!(err, QrFrameError::Validation(_)));
    assert_eq!(renderer.registry().acquired_total(), 0);
}

#[tokio::test]
async fn stale_token_is_reported_as_superseded() {
    let renderer = CodeRenderer::new(StyledEngine::new());
    let counter = GenerationCounter::new();
    let stale = counter.begin();
    let _newer = counter.begin();
    let err = renderer
        .render_current(&config(), 64, &stale)
        .await
        .unwrap_err();
    assert!(matches!(err, QrFrameError::Superseded { generation: 1 }));
    assert_eq!(renderer.registry().live(), 0);
}

#[test]
fn bitmap_constructor_enforces_square_and_opaque() {
    let ok = NormalizedBitmap::new(image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255])));
    assert_eq!(ok.unwrap().size(), 4);

    let wide = NormalizedBitmap::new(image::RgbaImage::from_pixel(4, 3, image::Rgba([0, 0, 0, 255])));
    assert!(matches!(wide, Err(QrFrameError::Validation(_))));

    let clear = NormalizedBitmap::new(image::RgbaImage::new(4, 4));
    assert!(matches!(clear, Err(QrFrameError::Validation(_))));
}
