use std::sync::Arc;

use super::*;
use crate::assets::logo::LogoImage;
use crate::config::style::{CodeStyleConfig, ColorStop, ErrorCorrection};

fn opts_for(style: CodeStyleConfig, size: u32) -> EngineOptions {
    EngineOptions::for_render(&style.with_data("https://example.com"), size)
}

fn matrix() -> ModuleMatrix {
    ModuleMatrix::encode("https://example.com", 0, ErrorCorrection::Q).unwrap()
}

#[test]
fn layout_centres_and_floors_module_size() {
    let l = SymbolLayout::compute(300, 300, 0, 29).unwrap();
    assert_eq!(l.dot, 10.0);
    assert_eq!(l.symbol_size(), 290.0);
    assert_eq!((l.x0, l.y0), (5.0, 5.0));

    let wide = SymbolLayout::compute(400, 300, 10, 28).unwrap();
    assert_eq!(wide.dot, 10.0);
    assert_eq!((wide.x0, wide.y0), (60.0, 10.0));
}

#[test]
fn layout_rejects_too_small_targets() {
    let err = SymbolLayout::compute(20, 20, 0, 29).unwrap_err();
    assert!(matches!(err, QrFrameError::Engine(_)));
}

#[test]
fn logo_box_keeps_aspect_and_clears_symmetric_span() {
    let layout = SymbolLayout::compute(290, 290, 0, 29).unwrap();
    let logo = LogoImage::from_rgba(image::RgbaImage::new(200, 100)).unwrap();
    let io = ImageOptions::default();
    let b = LogoBox::compute(&layout, &logo, &io).unwrap();
    assert!((b.w - 116.0).abs() < 1e-9);
    assert!((b.h - 58.0).abs() < 1e-9);
    assert!((b.x - 87.0).abs() < 1e-9);
    // 12 columns rounded up to 13 for a centred odd span.
    assert!(b.covers(14, 8));
    assert!(b.covers(14, 20));
    assert!(!b.covers(14, 7));
    assert!(!b.covers(14, 21));
    assert!(!b.covers(10, 14));
}

#[test]
fn document_has_root_geometry_and_no_gradients_by_default() {
    let svg = build_svg(&matrix(), &opts_for(CodeStyleConfig::default(), 300)).unwrap();
    assert!(svg.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300" viewBox="0 0 300 300">"#
    ));
    assert!(svg.contains(r##"<rect x="0" y="0" width="300" height="300" fill="#ffffff"/>"##));
    assert!(svg.contains(r##"<g fill="#000000">"##));
    assert!(!svg.contains("Gradient"));
    assert!(!svg.contains("<image"));
    parse_svg_ok(&svg);
}

#[test]
fn transparent_background_is_skipped() {
    let mut style = CodeStyleConfig::default();
    style.background_options.color = "transparent".to_string();
    let svg = build_svg(&matrix(), &opts_for(style, 300)).unwrap();
    assert!(!svg.contains(r#"width="300" height="300" fill="#));
}

#[test]
fn gradients_become_user_space_defs() {
    let mut style = CodeStyleConfig::default();
    style.dots_options.gradient = Some(Gradient {
        kind: GradientType::Radial,
        rotation: 0.0,
        color_stops: vec![
            ColorStop {
                offset: 0.0,
                color: "#ff0000".to_string(),
            },
            ColorStop {
                offset: 1.0,
                color: "#0000ff".to_string(),
            },
        ],
    });
    let svg = build_svg(&matrix(), &opts_for(style, 300)).unwrap();
    assert!(svg.contains(r#"<radialGradient id="dots-color" gradientUnits="userSpaceOnUse""#));
    assert!(svg.contains(r#"<g fill="url(#dots-color)">"#));
    // Corner colours fall back to the dot paint.
    assert!(svg.contains(r#"<radialGradient id="corners-square-color""#));
    parse_svg_ok(&svg);
}

#[test]
fn every_dot_type_produces_parseable_markup() {
    for kind in [
        DotType::Square,
        DotType::Dots,
        DotType::Rounded,
        DotType::ExtraRounded,
        DotType::Classy,
        DotType::ClassyRounded,
    ] {
        let mut style = CodeStyleConfig::default();
        style.dots_options.kind = kind;
        style.corners_square_options.kind = Some(CornerSquareType::ExtraRounded);
        style.corners_dot_options.kind = Some(CornerDotType::Dot);
        let svg = build_svg(&matrix(), &opts_for(style, 300)).unwrap();
        parse_svg_ok(&svg);
    }
}

#[test]
fn isolated_rounded_dot_is_fully_round() {
    let d = dot_shape(DotType::Rounded, 0.0, 0.0, 10.0, Neighbors::default());
    assert_eq!(d.matches('A').count(), 4);

    let joined = Neighbors {
        left: true,
        right: true,
        ..Neighbors::default()
    };
    let flat = dot_shape(DotType::Rounded, 0.0, 0.0, 10.0, joined);
    assert!(flat.starts_with("<rect"));
}

#[test]
fn logo_hides_modules_under_it() {
    let logo = Arc::new(LogoImage::from_rgba(image::RgbaImage::from_pixel(
        8,
        8,
        image::Rgba([255, 0, 0, 255]),
    ))
    .unwrap());
    let base = CodeStyleConfig::default().with_logo(Some(logo));
    let shown = {
        let mut s = base.clone();
        s.image_options.hide_background_dots = false;
        build_svg(&matrix(), &opts_for(s, 300)).unwrap()
    };
    let hidden = build_svg(&matrix(), &opts_for(base, 300)).unwrap();
    assert!(hidden.contains(r#"<image href="data:image/png;base64,"#));
    assert!(hidden.matches("<rect").count() < shown.matches("<rect").count());
}

fn parse_svg_ok(svg: &str) {
    crate::assets::svg_raster::parse_svg(svg.as_bytes()).unwrap();
}
