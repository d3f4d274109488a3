use super::*;

#[test]
fn decode_png_logo() {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
    let png = crate::assets::codec::encode_png(&img).unwrap();
    let logo = decode_logo(&png).unwrap();
    assert_eq!((logo.width(), logo.height()), (3, 2));
    assert_eq!(logo.pixels(), &img);
}

#[test]
fn decode_svg_logo_is_rasterized_to_bounded_size() {
    let svg = br##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#123456"/></svg>"##;
    let logo = decode_logo(svg).unwrap();
    assert_eq!((logo.width(), logo.height()), (SVG_LOGO_MAX_SIDE, SVG_LOGO_MAX_SIDE / 2));
    assert_eq!(logo.pixels().get_pixel(10, 10).0, [0x12, 0x34, 0x56, 255]);
}

#[test]
fn garbage_is_a_logo_fetch_failure() {
    let err = decode_logo(b"definitely not an image").unwrap_err();
    assert!(matches!(err, QrFrameError::LogoFetch(_)));
}

#[test]
fn missing_file_degrades_to_none() {
    let path = std::path::Path::new("target/does-not-exist/logo.png");
    assert!(matches!(load_logo(path), Err(QrFrameError::LogoFetch(_))));
    assert!(load_logo_or_none(path).is_none());
}

#[test]
fn empty_pixels_are_rejected() {
    let err = LogoImage::from_rgba(image::RgbaImage::new(0, 0)).unwrap_err();
    assert!(matches!(err, QrFrameError::LogoFetch(_)));
}
