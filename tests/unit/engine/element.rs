use super::*;

#[test]
fn to_document_adds_namespace_once() {
    let bare = VectorNode::new(r#"<svg width="2" height="2"><rect/></svg>"#);
    assert_eq!(
        bare.to_document(),
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect/></svg>"#
    );

    let with_ns = VectorNode::new(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
    assert_eq!(with_ns.to_document(), with_ns.markup());
}

#[test]
fn for_render_sanitizes_and_resizes() {
    let cfg = CodeStyleConfig::default().with_data(" a \n b ");
    let opts = EngineOptions::for_render(&cfg, 640);
    assert_eq!((opts.width, opts.height), (640, 640));
    assert_eq!(opts.data, "a\r\nb");
    assert_eq!(opts.style.width, 640);
    assert!(opts.logo.is_none());
}
