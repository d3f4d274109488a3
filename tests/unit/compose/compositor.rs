use super::*;
use crate::config::frames::{FrameCatalog, Placement};

const BLUE_FRAME: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30" viewBox="0 0 40 30" fill="none"><rect width="40" height="30" fill="#0000ff"/></svg>"##;

fn frame() -> FrameRecord {
    FrameRecord::new(
        "blue",
        BLUE_FRAME,
        40,
        30,
        Placement {
            x: 5,
            y: 8,
            size: 12,
        },
    )
    .unwrap()
}

fn bitmap(size: u32, rgb: [u8; 3]) -> NormalizedBitmap {
    NormalizedBitmap::new(image::RgbaImage::from_pixel(
        size,
        size,
        image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
    ))
    .unwrap()
}

#[test]
fn raster_places_code_on_top_of_background() {
    let artifact = compose(&frame(), bitmap(12, [255, 0, 0]), OutputKind::Raster).unwrap();
    let CompositeArtifact::Raster(r) = artifact else {
        panic!("expected raster artifact");
    };
    assert_eq!(r.image.dimensions(), (40, 30));
    assert_eq!(r.image.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(r.image.get_pixel(5, 8).0, [255, 0, 0, 255]);
    assert_eq!(r.image.get_pixel(16, 19).0, [255, 0, 0, 255]);
    assert_eq!(r.image.get_pixel(17, 19).0, [0, 0, 255, 255]);
    assert_eq!(r.image.get_pixel(16, 20).0, [0, 0, 255, 255]);
}

#[test]
fn mismatched_code_size_is_rescaled_to_placement() {
    let artifact = compose(&frame(), bitmap(48, [0, 255, 0]), OutputKind::Raster).unwrap();
    let CompositeArtifact::Raster(r) = artifact else {
        panic!("expected raster artifact");
    };
    assert_eq!(r.image.get_pixel(10, 14).0, [0, 255, 0, 255]);
    assert_eq!(r.image.get_pixel(17, 8).0, [0, 0, 255, 255]);
}

#[test]
fn vector_wraps_background_and_appends_code_image() {
    let artifact = compose(&frame(), bitmap(12, [255, 0, 0]), OutputKind::Vector).unwrap();
    assert_eq!(artifact.kind(), OutputKind::Vector);
    let CompositeArtifact::Vector(v) = artifact else {
        panic!("expected vector artifact");
    };
    assert_eq!((v.width, v.height), (40, 30));
    assert_eq!(v.root.attr("viewBox"), Some("0 0 40 30"));
    assert_eq!(v.root.attr("fill"), Some("none"));

    let names: Vec<&str> = v.root.elements().map(SvgElement::name).collect();
    assert_eq!(names, ["rect", "image"]);

    let img = v.code_element().unwrap();
    assert_eq!(img.attr("x"), Some("5"));
    assert_eq!(img.attr("y"), Some("8"));
    assert_eq!(img.attr("width"), Some("12"));
    assert_eq!(img.attr("height"), Some("12"));
    assert!(img.attr("href").unwrap().starts_with("data:image/png;base64,"));

    let decoded = v.decode_code_image().unwrap();
    assert_eq!(decoded, *bitmap(12, [255, 0, 0]).image());
}

#[test]
fn vector_output_is_a_parseable_document() {
    let catalog = FrameCatalog::builtin();
    for frame in catalog.iter() {
        let artifact = compose(frame, bitmap(8, [0, 0, 0]), OutputKind::Vector).unwrap();
        let CompositeArtifact::Vector(v) = artifact else {
            panic!("expected vector artifact");
        };
        let tree = crate::assets::svg_raster::parse_svg(v.root.to_document().as_bytes()).unwrap();
        assert_eq!(tree.size().width(), frame.width as f32);
        assert_eq!(tree.size().height(), frame.height as f32);
    }
}

#[test]
fn malformed_background_is_a_serialization_error() {
    let mut broken = frame();
    broken.background = "<svg><g></svg>".to_string();
    let err = compose(&broken, bitmap(12, [0, 0, 0]), OutputKind::Vector).unwrap_err();
    assert!(matches!(err, QrFrameError::Serialization(_)));
    let err = compose(&broken, bitmap(12, [0, 0, 0]), OutputKind::Raster).unwrap_err();
    assert!(matches!(err, QrFrameError::Serialization(_)));
}
