use gardenkit_designer::transform::{
    clamp_to_bounds, pan, screen_to_world, world_to_screen, zoom_about, AffineTransform,
};
use gardenkit_designer::{Point, Size};
use proptest::prelude::*;

#[test]
fn test_zoom_about_keeps_center_fixed() {
    let t = AffineTransform::scale_translate(1.2, -300.0, -140.0);
    let center = Point::new(640.0, 400.0);
    let before = screen_to_world(center.x, center.y, &t);

    let zoomed = zoom_about(&t, 1.5, center);
    let after = screen_to_world(center.x, center.y, &zoomed);

    assert!(before.approx_eq(&after, 1e-9));
    assert!((zoomed.scale() - 1.8).abs() < 1e-12);
}

#[test]
fn test_pan_is_pure_translation() {
    let t = AffineTransform::scale_translate(2.0, 10.0, 20.0);
    let moved = pan(&t, -5.0, 7.5);
    assert_eq!(moved.scale(), 2.0);
    assert_eq!(moved.offset(), (5.0, 27.5));
}

#[test]
fn test_screen_to_world_with_zero_scale_is_identity() {
    let degenerate = AffineTransform::scale_translate(0.0, 10.0, 10.0);
    assert_eq!(screen_to_world(3.0, 4.0, &degenerate), Point::new(3.0, 4.0));
}

#[test]
fn test_clamp_pins_small_content_to_origin() {
    let t = AffineTransform::scale_translate(0.5, 120.0, -60.0);
    let clamped = clamp_to_bounds(&t, Size::new(400.0, 300.0), Size::new(1280.0, 800.0));
    assert_eq!(clamped.offset(), (0.0, 0.0));
    assert_eq!(clamped.scale(), 0.5);
}

#[test]
fn test_clamp_limits_large_content_to_far_edge() {
    let t = AffineTransform::scale_translate(1.0, -9000.0, 50.0);
    let clamped = clamp_to_bounds(&t, Size::new(5400.0, 5400.0), Size::new(1280.0, 800.0));
    assert_eq!(clamped.offset(), (1280.0 - 5400.0, 0.0));
}

proptest! {
    #[test]
    fn prop_zoom_about_inverts(
        scale in 0.5f64..2.0,
        tx in -4000.0f64..0.0,
        ty in -4000.0f64..0.0,
        factor in 0.25f64..4.0,
        cx in 0.0f64..1280.0,
        cy in 0.0f64..800.0,
    ) {
        let t = AffineTransform::scale_translate(scale, tx, ty);
        let center = Point::new(cx, cy);
        let back = zoom_about(&zoom_about(&t, factor, center), 1.0 / factor, center);
        prop_assert!(back.approx_eq(&t, 1e-6), "{} != {}", back, t);
    }

    #[test]
    fn prop_world_screen_round_trip(
        scale in 0.5f64..2.0,
        tx in -4000.0f64..0.0,
        x in 0.0f64..5400.0,
        y in 0.0f64..5400.0,
    ) {
        let t = AffineTransform::scale_translate(scale, tx, tx / 2.0);
        let screen = world_to_screen(x, y, &t);
        let world = screen_to_world(screen.x, screen.y, &t);
        prop_assert!(world.approx_eq(&Point::new(x, y), 1e-6));
    }

    #[test]
    fn prop_clamp_never_reveals_outside_content(
        scale in 0.5f64..2.0,
        tx in -20000.0f64..20000.0,
        ty in -20000.0f64..20000.0,
    ) {
        let content = Size::new(5400.0, 5400.0);
        let viewport = Size::new(1280.0, 800.0);
        let t = clamp_to_bounds(&AffineTransform::scale_translate(scale, tx, ty), content, viewport);

        let top_left = world_to_screen(0.0, 0.0, &t);
        let bottom_right = world_to_screen(content.width, content.height, &t);
        prop_assert!(top_left.x <= 1e-9 && top_left.y <= 1e-9);
        prop_assert!(bottom_right.x >= viewport.width - 1e-6);
        prop_assert!(bottom_right.y >= viewport.height - 1e-6);
    }
}
