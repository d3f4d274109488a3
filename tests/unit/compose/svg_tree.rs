use super::*;

#[test]
fn parse_keeps_svg_content_and_drops_foreign_metadata() {
    let markup = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     width="10" height="10" viewBox="0 0 10 10">
  <!-- comment -->
  <sodipodi:namedview id="base"/>
  <defs><linearGradient id="g"><stop offset="0" stop-color="#fff"/></linearGradient></defs>
  <rect width="10" height="10" fill="url(#g)" sodipodi:nodetypes="cccc"/>
  <use xlink:href="#g"/>
  <text x="1" y="5">A &amp; B</text>
</svg>"##;
    let root = SvgElement::parse_document(markup).unwrap();
    assert_eq!(root.name(), "svg");
    assert_eq!(root.attr("viewBox"), Some("0 0 10 10"));

    let names: Vec<&str> = root.elements().map(SvgElement::name).collect();
    assert_eq!(names, ["defs", "rect", "use", "text"]);

    let rect = root.elements().nth(1).unwrap();
    assert_eq!(rect.attributes().count(), 3);
    assert!(root.uses_xlink());
    assert_eq!(root.descendants_named("stop").len(), 1);

    let xml = root.to_xml();
    assert!(xml.contains(r##"<use xlink:href="#g"/>"##));
    assert!(xml.contains("<text x=\"1\" y=\"5\">A &amp; B</text>"));
    assert!(!xml.contains("sodipodi"));
}

#[test]
fn non_svg_root_is_rejected() {
    let err = SvgElement::parse_document("<html/>").unwrap_err();
    assert!(matches!(err, QrFrameError::Serialization(_)));

    let err = SvgElement::parse_document("<svg><rect></svg>").unwrap_err();
    assert!(matches!(err, QrFrameError::Serialization(_)));
}

#[test]
fn builder_and_document_serialization() {
    let mut root = SvgElement::new("svg")
        .with_attr("width", "4")
        .with_attr("xmlns", SVG_NS);
    root.set_attr("width", "5");
    root.push_element(SvgElement::new("image").with_attr("href", "data:x\"y"));
    assert_eq!(
        root.to_document(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"5\" xmlns=\"http://www.w3.org/2000/svg\"><image href=\"data:x&quot;y\"/></svg>"
    );
    assert!(!root.uses_xlink());
}
