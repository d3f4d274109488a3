use super::*;
use crate::engine::VectorNode;

#[test]
fn live_count_tracks_drops() {
    let registry = SurfaceRegistry::new();
    let a = registry.acquire(10, 10);
    let b = registry.acquire(20, 20);
    assert_eq!(registry.live(), 2);
    assert_ne!(a.id(), b.id());
    drop(a);
    assert_eq!(registry.live(), 1);
    drop(b);
    assert_eq!(registry.live(), 0);
    assert_eq!(registry.acquired_total(), 2);
}

#[test]
fn release_happens_on_unwind_paths_too() {
    let registry = SurfaceRegistry::new();
    let r = registry.clone();
    let result = std::panic::catch_unwind(move || {
        let _surface = r.acquire(4, 4);
        panic!("engine blew up");
    });
    assert!(result.is_err());
    assert_eq!(registry.live(), 0);
}

#[test]
fn take_first_detaches_in_mount_order() {
    let registry = SurfaceRegistry::new();
    let mut surface = registry.acquire(4, 4);
    assert!(surface.is_empty());
    surface.mount(RenderedElement::Svg(VectorNode::new("<svg/>")));
    surface.mount(RenderedElement::container("div", vec![]));
    assert_eq!(surface.len(), 2);
    assert!(matches!(surface.first_element(), Some(RenderedElement::Svg(_))));
    assert!(matches!(surface.take_first(), Some(RenderedElement::Svg(_))));
    assert!(matches!(
        surface.take_first(),
        Some(RenderedElement::Container { .. })
    ));
    assert!(surface.take_first().is_none());
}
