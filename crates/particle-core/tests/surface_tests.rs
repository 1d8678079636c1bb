// Host-side tests for the viewport/camera binding and colour helpers.

use glam::{Vec2, Vec3};
use particle_core::*;
use rand::prelude::*;

#[test]
fn resize_twice_with_same_size_is_idempotent() {
    let mut vp = Viewport::new(640, 480).expect("viewport");
    vp.resize(1920, 1080).expect("resize");
    let first = (vp.camera.clone(), vp.camera.projection_matrix());
    vp.resize(1920, 1080).expect("resize");
    assert_eq!(vp.camera, first.0);
    assert_eq!(vp.camera.projection_matrix(), first.1);
    assert!((vp.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
}

#[test]
fn empty_viewport_is_rejected_and_state_kept() {
    assert!(Viewport::new(0, 480).is_err());
    let mut vp = Viewport::new(800, 600).expect("viewport");
    let before = vp.clone();
    assert_eq!(
        vp.resize(800, 0),
        Err(SurfaceError::EmptyViewport {
            width: 800,
            height: 0
        })
    );
    assert_eq!(vp, before);
}

#[test]
fn engine_resize_does_not_touch_particle_buffers() {
    let vp = Viewport::new(800, 600).expect("viewport");
    let mut engine = Engine::new(500, FieldConfig::default(), vp, StdRng::seed_from_u64(4));
    engine.regenerate_now().expect("regenerate");
    engine.step(&GestureSignal::idle(&ConditionerProfile::default()));
    let live = engine.field().live().to_vec();
    let colors = engine.field().colors().to_vec();

    engine.resize(300, 900).expect("resize");
    assert!(engine.resize(0, 0).is_err());

    assert_eq!(engine.field().live(), live.as_slice());
    assert_eq!(engine.field().colors(), colors.as_slice());
    assert_eq!(engine.viewport().width, 300);
    assert!((engine.viewport().camera.aspect - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn camera_follow_eases_and_reaims() {
    let mut cam = Camera::default();
    cam.target = Vec3::ONE;
    cam.follow(Vec2::new(4.0, -2.0), 0.1);
    assert!((cam.eye.x - 0.4).abs() < 1e-6);
    assert!((cam.eye.y + 0.2).abs() < 1e-6);
    assert_eq!(cam.eye.z, CAMERA_Z);
    assert_eq!(cam.target, Vec3::ZERO);
}

#[test]
fn hex_parsing_accepts_common_forms() {
    assert_eq!(Rgb::from_hex("#ff0000").expect("hex"), Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(Rgb::from_hex("00ff00").expect("hex"), Rgb::new(0.0, 1.0, 0.0));
    assert_eq!(Rgb::from_hex("#00f").expect("hex"), Rgb::new(0.0, 0.0, 1.0));
    let default = Rgb::from_hex(DEFAULT_COLOR_HEX).expect("hex");
    assert_eq!(default, Rgb::from_array(DEFAULT_COLOR));
    assert_eq!(default.to_hex(), DEFAULT_COLOR_HEX);
    for bad in ["", "#", "#12345", "#gg0000", "red", "#ff00001"] {
        assert!(Rgb::from_hex(bad).is_err(), "accepted {bad:?}");
    }
    for hex in PALETTE_HEX {
        assert!(Rgb::from_hex(hex).is_ok());
    }
}

#[test]
fn hsl_round_trips_primary_colours() {
    let (h, s, l) = Rgb::new(1.0, 0.0, 0.0).to_hsl();
    assert_eq!((h, s, l), (0.0, 1.0, 0.5));
    let (h, _, _) = Rgb::new(0.0, 0.0, 1.0).to_hsl();
    assert!((h - 2.0 / 3.0).abs() < 1e-6);

    let back = Rgb::from_hsl(1.0 / 3.0, 1.0, 0.5);
    assert!((back.0 - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
}

#[test]
fn hsl_offsets_wrap_hue_and_clamp_lightness() {
    let red = Rgb::new(1.0, 0.0, 0.0);
    assert!((red.offset_hsl(1.0, 0.0, 0.0).0 - red.0).length() < 1e-5);
    assert!((red.offset_hsl(-1.0, 0.0, 0.0).0 - red.0).length() < 1e-5);
    let cyan = red.offset_hsl(0.5, 0.0, 0.0);
    assert!((cyan.0 - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-5);

    assert_eq!(red.offset_hsl(0.0, 0.0, 2.0), Rgb::WHITE);
    assert_eq!(red.offset_hsl(0.0, 0.0, -2.0).0, Vec3::ZERO);
    assert_eq!(red.offset_hsl(0.0, -5.0, 0.0).0, Vec3::splat(0.5));
}

#[test]
fn scaling_saturates_channels() {
    let c = Rgb::new(0.8, 0.5, 0.1).scale(2.0);
    assert_eq!(c.0, Vec3::new(1.0, 1.0, 0.2));
}

#[test]
fn theme_payload_parsing() {
    let t = ThemeSpec::from_json(r##"{"color":"#ff0000","shape":"star"}"##).expect("theme");
    assert_eq!(t.shape, Shape::Star);
    assert_eq!(t.color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(t.size, None);

    let t = ThemeSpec::from_json(r##"{"color":"#123","shape":"nebula","size":0.3}"##)
        .expect("theme");
    assert_eq!(t.shape, Shape::Random);
    assert_eq!(t.size, Some(0.3));

    assert!(matches!(
        ThemeSpec::from_json(r##"{"shape":"star"}"##),
        Err(ThemeError::Malformed(_))
    ));
    assert!(matches!(
        ThemeSpec::from_json(r##"{"color":"blue","shape":"star"}"##),
        Err(ThemeError::Color(_))
    ));
    assert!(matches!(
        ThemeSpec::from_json(r##"{"color":"#fff","shape":"star","size":-1}"##),
        Err(ThemeError::InvalidSize(_))
    ));
}
