use super::*;
use crate::compose::compositor::{RasterArtifact, VectorArtifact};
use crate::compose::svg_tree::SvgElement;

fn raster(px: [u8; 4]) -> CompositeArtifact {
    CompositeArtifact::Raster(RasterArtifact {
        image: image::RgbaImage::from_pixel(16, 8, image::Rgba(px)),
    })
}

fn vector() -> CompositeArtifact {
    let mut root = SvgElement::new("svg")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
        .with_attr("viewBox", "0 0 4 4");
    root.push_element(SvgElement::new("image").with_attr("href", "data:image/png;base64,AA=="));
    CompositeArtifact::Vector(VectorArtifact {
        width: 4,
        height: 4,
        root,
    })
}

#[test]
fn file_names_use_millisecond_timestamp_and_extension() {
    assert_eq!(
        file_name_for(ExportFormat::Png, 1_700_000_000_123),
        "qr-code-1700000000123.png"
    );
    assert_eq!(file_name_for(ExportFormat::Jpeg, 7), "qr-code-7.jpeg");
    assert_eq!(file_name_for(ExportFormat::Svg, 7), "qr-code-7.svg");
    assert!(unix_millis() > 1_600_000_000_000);
}

#[test]
fn png_is_lossless() {
    let artifact = raster([10, 20, 30, 200]);
    let bytes = export_artifact(&artifact, ExportFormat::Png).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    let CompositeArtifact::Raster(r) = artifact else {
        unreachable!()
    };
    assert_eq!(decoded, r.image);
}

#[test]
fn jpeg_flattens_transparency_over_white() {
    let bytes = export_artifact(&raster([0, 0, 0, 0]), ExportFormat::Jpeg).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (16, 8));
    assert!(decoded.pixels().all(|p| p.0.iter().all(|c| *c >= 250)));
}

#[test]
fn svg_has_declaration_and_content() {
    let file = export_file(&vector(), ExportFormat::Svg, 42).unwrap();
    assert_eq!(file.file_name, "qr-code-42.svg");
    assert_eq!(file.mime, "image/svg+xml");
    let text = String::from_utf8(file.bytes).unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
    assert!(text.contains(r#"viewBox="0 0 4 4""#));
    assert!(text.contains("<image href=\"data:image/png;base64,AA==\"/>"));
}

#[test]
fn kind_mismatch_is_reported_not_converted() {
    for format in [ExportFormat::Png, ExportFormat::Jpeg] {
        let err = export_artifact(&vector(), format).unwrap_err();
        assert!(matches!(err, QrFrameError::ArtifactMismatch(_)), "{format}");
    }
    let err = export_artifact(&raster([0, 0, 0, 255]), ExportFormat::Svg).unwrap_err();
    assert!(matches!(err, QrFrameError::ArtifactMismatch(_)));
}
