use std::sync::{Arc, Mutex};

use gardenkit_core::{EditorEvent, EventBus, EventCategory, EventFilter, ViewportEvent};
use gardenkit_designer::{Point, Size, Viewport};
use gardenkit_settings::Config;

fn world_viewport() -> Viewport {
    Viewport::new(Size::new(800.0, 600.0), Size::new(5400.0, 5400.0))
}

#[test]
fn test_viewport_starts_at_origin() {
    let vp = world_viewport();
    assert_eq!(vp.scale(), 1.0);
    assert_eq!(vp.screen_to_world(0.0, 0.0), Point::new(0.0, 0.0));
}

#[test]
fn test_wheel_keeps_pointer_fixed() {
    let mut vp = world_viewport();
    vp.pan_by(-1000.0, -1000.0);
    let pointer = Point::new(400.0, 300.0);
    let before = vp.screen_to_world(pointer.x, pointer.y);

    assert!(vp.wheel(-120.0, pointer));
    assert!((vp.scale() - Viewport::WHEEL_FACTOR).abs() < 1e-12);
    let after = vp.screen_to_world(pointer.x, pointer.y);
    assert!(before.approx_eq(&after, 1e-9));

    assert!(vp.wheel(120.0, pointer));
    assert!((vp.scale() - 1.0).abs() < 1e-12);
}

#[test]
fn test_set_scale_respects_zoom_limits() {
    let mut vp = world_viewport();
    vp.set_scale(10.0, None);
    assert_eq!(vp.scale(), Viewport::MAX_ZOOM);
    vp.set_scale(0.01, None);
    assert_eq!(vp.scale(), Viewport::MIN_ZOOM);
    assert!(!vp.set_scale(0.01, None));
}

#[test]
fn test_pan_cannot_reveal_area_before_origin() {
    let mut vp = world_viewport();
    assert!(!vp.pan_by(50.0, 50.0));
    assert_eq!(vp.transform().offset(), (0.0, 0.0));

    vp.pan_by(-100_000.0, -100_000.0);
    assert_eq!(vp.transform().offset(), (800.0 - 5400.0, 600.0 - 5400.0));
}

#[test]
fn test_resize_reclamps_translation() {
    let mut vp = world_viewport();
    vp.pan_by(-100_000.0, 0.0);
    vp.resize(1600.0, 600.0);
    assert_eq!(vp.transform().offset().0, 1600.0 - 5400.0);
}

#[test]
fn test_from_config_uses_world_extent() {
    let mut config = Config::default();
    config.world.cols = 10;
    config.world.rows = 5;
    config.viewport.max_zoom = 3.0;
    let vp = Viewport::from_config(&config);
    assert_eq!(vp.content_size(), Size::new(200.0, 100.0));
    assert_eq!(vp.zoom_limits(), (0.5, 3.0));
}

#[test]
fn test_changes_are_published() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Viewport]), move |event| {
        sink.lock().unwrap().push(event.clone());
    });

    let mut vp = world_viewport().with_event_bus(bus);
    vp.set_scale(2.0, Some(Point::new(0.0, 0.0)));
    vp.set_scale(2.0, Some(Point::new(0.0, 0.0)));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(matches!(
        seen[0],
        EditorEvent::Viewport(ViewportEvent::TransformChanged { scale, .. }) if scale == 2.0
    ));
}
