use super::*;

fn rect_svg() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#.to_string()
}

#[test]
fn builtin_frames_satisfy_placement_invariant() {
    let catalog = FrameCatalog::builtin();
    assert_eq!(catalog.ids().collect::<Vec<_>>(), ["elegant", "minimal", "none"]);
    for frame in catalog.iter() {
        frame.validate().unwrap();
        assert!(frame.position.x + frame.position.size <= frame.width);
        assert!(frame.position.y + frame.position.size <= frame.height);
    }
    let minimal = catalog.get("minimal").unwrap();
    assert_eq!((minimal.width, minimal.height), (6335, 3208));
    assert_eq!(minimal.position, Placement { x: 650, y: 454, size: 2300 });
}

#[test]
fn unknown_frame_is_frame_not_found() {
    let err = FrameCatalog::builtin().get("poster").unwrap_err();
    assert!(matches!(err, QrFrameError::FrameNotFound(ref id) if id == "poster"));
}

#[test]
fn placement_overflow_is_rejected_at_construction() {
    let err = FrameRecord::new("wide", rect_svg(), 100, 100, Placement { x: 60, y: 0, size: 50 })
        .unwrap_err();
    assert!(matches!(err, QrFrameError::Validation(_)));

    FrameRecord::new("exact", rect_svg(), 100, 100, Placement { x: 50, y: 50, size: 50 }).unwrap();
}

#[test]
fn catalog_json_uses_svg_and_qr_size_keys() {
    let json = r#"{
        "card": {
            "svg": "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>",
            "position": { "x": 1, "y": 2, "qrSize": 5 },
            "width": 10,
            "height": 10
        }
    }"#;
    let catalog: FrameCatalog = serde_json::from_str(json).unwrap();
    let card = catalog.get("card").unwrap();
    assert_eq!(card.id, "card");
    assert_eq!(card.position, Placement { x: 1, y: 2, size: 5 });
}

#[test]
fn catalog_json_with_bad_placement_fails_to_load() {
    let json = r#"{
        "card": {
            "background": "<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
            "position": { "x": 8, "y": 0, "size": 5 },
            "width": 10,
            "height": 10
        }
    }"#;
    let err = serde_json::from_str::<FrameCatalog>(json).unwrap_err();
    assert!(err.to_string().contains("does not fit"), "{err}");
}

#[test]
fn preview_fractions_are_relative_to_canvas() {
    let frame = FrameCatalog::builtin().get("minimal").unwrap().clone();
    let f = frame.preview_fractions();
    assert!((f.left - 650.0 / 6335.0).abs() < 1e-12);
    assert!((f.top - 454.0 / 3208.0).abs() < 1e-12);
    assert!((f.width - 2300.0 / 6335.0).abs() < 1e-12);
    assert!((f.height - 2300.0 / 3208.0).abs() < 1e-12);
}
