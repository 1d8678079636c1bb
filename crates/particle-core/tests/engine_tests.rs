// Host-side tests for the per-frame animation loop and configuration handling.

use glam::{Vec2, Vec3};
use particle_core::*;
use rand::prelude::*;

fn signal(openness: f32) -> GestureSignal {
    GestureSignal {
        is_open: openness > 0.4,
        openness,
        position: Vec3::ZERO,
    }
}

fn make_engine(capacity: usize) -> Engine {
    let viewport = Viewport::new(800, 600).expect("viewport");
    Engine::new(
        capacity,
        FieldConfig::default(),
        viewport,
        StdRng::seed_from_u64(42),
    )
}

/// One fixed point per particle so targets are easy to reason about.
fn fixed_cloud(capacity: usize) -> ShapeCloud {
    ShapeCloud {
        positions: (0..capacity)
            .map(|i| Vec3::new(1.0 + i as f32, -2.0, 0.5))
            .collect(),
        colors: vec![Vec3::new(0.2, 0.3, 0.4); capacity],
    }
}

fn max_gap(engine: &Engine) -> f32 {
    engine
        .field()
        .live()
        .iter()
        .zip(engine.field().target())
        .map(|(l, t)| (*t - *l).length())
        .fold(0.0, f32::max)
}

#[test]
fn expansion_matches_reference_points() {
    let p = AnimationParams::default();
    assert!((p.expansion(0.0) - 1.2).abs() < 1e-6);
    assert!((p.expansion(1.0) - 12.0).abs() < 1e-5);
    assert!((p.expansion(0.5) - 3.9).abs() < 1e-5);
}

#[test]
fn expansion_is_increasing_and_convex() {
    let p = AnimationParams::default();
    let samples: Vec<f32> = (0..=20).map(|i| p.expansion(i as f32 / 20.0)).collect();
    for w in samples.windows(2) {
        assert!(w[1] > w[0]);
    }
    for w in samples.windows(3) {
        assert!(w[2] - w[1] >= w[1] - w[0] - 1e-5, "not convex: {w:?}");
    }
}

#[test]
fn step_before_any_shape_is_installed_leaves_particles_alone() {
    let mut engine = make_engine(64);
    assert!(!engine.field().has_shape());
    let visuals = engine.step(&signal(0.9));
    assert!(engine.field().live().iter().all(|p| *p == Vec3::ZERO));
    assert!((visuals.expansion - AnimationParams::default().expansion(0.9)).abs() < 1e-5);
}

#[test]
fn buffers_keep_their_length_across_regeneration() {
    let mut engine = make_engine(300);
    assert!(engine.regenerate_now().expect("regenerate"));
    for shape in Shape::ALL {
        engine.set_shape(shape);
        engine.regenerate_now().expect("regenerate");
        engine.step(&signal(0.5));
        let f = engine.field();
        assert_eq!(f.capacity(), 300);
        assert_eq!(f.live().len(), 300);
        assert_eq!(f.target().len(), 300);
        assert_eq!(f.colors().len(), 300);
    }
    assert!(!engine.regenerate_now().expect("nothing pending"));
}

#[test]
fn mismatched_cloud_is_rejected_without_touching_the_field() {
    let mut engine = make_engine(10);
    engine.install(fixed_cloud(10)).expect("install");
    let colors_before = engine.field().colors().to_vec();
    let err = engine.install(fixed_cloud(9)).unwrap_err();
    assert_eq!(err, FieldError::CapacityMismatch { expected: 10, got: 9 });
    assert_eq!(engine.field().colors(), colors_before.as_slice());
}

#[test]
fn target_is_shape_scaled_by_expansion() {
    let mut engine = make_engine(4);
    engine.install(fixed_cloud(4)).expect("install");
    engine.step(&signal(0.5));
    for (i, t) in engine.field().target().iter().enumerate() {
        let expected = Vec3::new(1.0 + i as f32, -2.0, 0.5) * 3.9;
        assert!((*t - expected).length() < 1e-4);
    }
}

#[test]
fn live_positions_converge_monotonically_without_overshoot() {
    let mut engine = make_engine(8);
    engine.install(fixed_cloud(8)).expect("install");
    let mut prev = f32::MAX;
    for _ in 0..100 {
        engine.step(&signal(0.3));
        let gap = max_gap(&engine);
        assert!(gap < prev, "gap grew: {gap} >= {prev}");
        prev = gap;
        // the approach never passes the target on any axis
        for (l, t) in engine.field().live().iter().zip(engine.field().target()) {
            let l = l.to_array();
            let t = t.to_array();
            for axis in 0..3 {
                assert!(l[axis] * t[axis].signum() <= t[axis].abs() + 1e-5);
            }
        }
    }
    assert!(prev < 1e-3);
}

#[test]
fn convergence_is_faster_when_the_hand_is_more_open() {
    let remaining = |openness: f32| {
        let mut engine = make_engine(8);
        engine.install(fixed_cloud(8)).expect("install");
        for _ in 0..10 {
            engine.step(&signal(openness));
        }
        let f = engine.field();
        (f.target()[0] - f.live()[0]).length() / f.target()[0].length()
    };
    let slow = remaining(0.1);
    let fast = remaining(0.7);
    assert!(fast < slow, "fast={fast} slow={slow}");
    let p = AnimationParams::default();
    assert!((slow - (1.0 - p.lerp_rate(0.1)).powi(10)).abs() < 1e-4);
}

#[test]
fn full_openness_jitters_only_x_and_y() {
    let mut engine = make_engine(32);
    engine.install(fixed_cloud(32)).expect("install");
    for _ in 0..300 {
        engine.step(&signal(1.0));
    }
    let f = engine.field();
    let mut xy_off = false;
    for (l, t) in f.live().iter().zip(f.target()) {
        assert!((l.z - t.z).abs() < 1e-3);
        xy_off |= (l.truncate() - t.truncate()).length() > 1e-6;
        // d' = (1 - rate) * d + jitter, so |d| <= amplitude / rate
        assert!((l.truncate() - t.truncate()).abs().max_element() < 0.25 + 1e-4);
    }
    assert!(xy_off);
}

#[test]
fn spin_speed_scales_with_openness() {
    let mut engine = make_engine(4);
    let p = engine.params.clone();
    engine.step(&signal(0.0));
    let r0 = engine.rotation();
    assert!((r0.x - p.base_rotation_speed).abs() < 1e-7);
    assert!((r0.y - p.base_rotation_speed * p.pitch_ratio).abs() < 1e-7);

    engine.step(&signal(1.0));
    let r1 = engine.rotation();
    assert!((r1.x - r0.x - p.spin(1.0)).abs() < 1e-6);
    assert!(p.spin(1.0) > p.spin(0.0));
}

#[test]
fn tree_damps_rotation_to_exactly_zero() {
    let mut engine = make_engine(4);
    for _ in 0..100 {
        engine.step(&signal(1.0));
    }
    assert!(engine.rotation().x > 0.5);
    engine.set_shape(Shape::Tree);
    let mut prev = engine.rotation().x;
    for _ in 0..200 {
        engine.step(&signal(1.0));
        let yaw = engine.rotation().x;
        assert!(yaw <= prev);
        prev = yaw;
    }
    assert_eq!(engine.rotation(), Vec2::ZERO);
}

#[test]
fn size_and_opacity_are_affine_in_openness() {
    let mut engine = make_engine(4);
    let p = engine.params.clone();
    let a = engine.step(&signal(0.0));
    let b = engine.step(&signal(0.5));
    let c = engine.step(&signal(1.0));
    assert!((a.point_size - p.size_base).abs() < 1e-6);
    assert!((b.point_size - (p.size_base + 0.5 * p.size_gain)).abs() < 1e-6);
    assert!(((c.point_size - b.point_size) - (b.point_size - a.point_size)).abs() < 1e-6);
    assert!((a.opacity - p.opacity_base).abs() < 1e-6);
    assert!(c.opacity <= 1.0 && c.opacity > a.opacity);
}

#[test]
fn point_size_override_replaces_only_the_base() {
    let p = AnimationParams::default();
    assert!((p.point_size(None, 0.0) - p.size_base).abs() < 1e-6);
    assert!((p.point_size(None, 1.0) - (p.size_base + p.size_gain)).abs() < 1e-6);
    assert!((p.point_size(Some(0.4), 0.0) - 0.4).abs() < 1e-6);
    let gain_with = p.point_size(Some(0.4), 1.0) - p.point_size(Some(0.4), 0.0);
    let gain_without = p.point_size(None, 1.0) - p.point_size(None, 0.0);
    assert!((gain_with - gain_without).abs() < 1e-6);
}

#[test]
fn camera_follows_hand_and_keeps_aiming_at_origin() {
    let mut engine = make_engine(4);
    let gesture = GestureSignal {
        is_open: false,
        openness: 0.2,
        position: Vec3::new(1.0, -0.5, 0.0),
    };
    let z = engine.viewport().camera.eye.z;
    for _ in 0..300 {
        engine.step(&gesture);
    }
    let cam = &engine.viewport().camera;
    let gain = engine.params.follow_gain;
    assert!((cam.eye.x - gain).abs() < 1e-3);
    assert!((cam.eye.y + 0.5 * gain).abs() < 1e-3);
    assert_eq!(cam.eye.z, z);
    assert_eq!(cam.target, Vec3::ZERO);
}

#[test]
fn nan_signal_is_absorbed() {
    let mut engine = make_engine(4);
    engine.install(fixed_cloud(4)).expect("install");
    let bad = GestureSignal {
        is_open: true,
        openness: f32::NAN,
        position: Vec3::splat(f32::NAN),
    };
    let v = engine.step(&bad);
    assert!(v.expansion.is_finite() && v.point_size.is_finite());
    assert!(engine.field().live().iter().all(|p| p.is_finite()));
    assert!(engine.viewport().camera.eye.is_finite());
}

#[test]
fn config_changes_queue_one_regeneration() {
    let mut engine = make_engine(4);
    let initial = engine.take_request().expect("initial request");
    assert_eq!(initial.shape, FieldConfig::default().shape);
    assert!(engine.take_request().is_none());

    assert!(!engine.set_shape(initial.shape));
    assert!(engine.take_request().is_none());

    assert!(engine.set_shape(Shape::Planet));
    assert!(engine.set_color(Rgb::new(0.0, 0.0, 1.0)));
    let req = engine.take_request().expect("request");
    assert_eq!(req.shape, Shape::Planet);
    assert_eq!(req.base_color, Rgb::new(0.0, 0.0, 1.0));

    assert!(engine.set_rainbow(true));
    assert!(engine.take_request().expect("rainbow").rainbow);
}

struct FixedTheme(&'static str);

impl ThemeService for FixedTheme {
    fn suggest_theme(&self, _mood: &str) -> Result<ThemeSpec, ThemeError> {
        ThemeSpec::from_json(self.0)
    }
}

struct OfflineTheme;

impl ThemeService for OfflineTheme {
    fn suggest_theme(&self, _mood: &str) -> Result<ThemeSpec, ThemeError> {
        Err(ThemeError::Unavailable("connection refused".into()))
    }
}

#[test]
fn theme_suggestion_switches_shape_and_regenerates() {
    let mut engine = make_engine(4);
    engine.take_request();

    let service = FixedTheme(r##"{"color":"#ff0000","shape":"star"}"##);
    assert!(engine.apply_theme(service.suggest_theme("excited")));
    assert_eq!(engine.config().shape, Shape::Star);
    let req = engine.take_request().expect("regeneration");
    assert_eq!(req.shape, Shape::Star);
    assert_eq!(req.base_color.to_hex(), "#ff0000");
}

#[test]
fn failed_theme_leaves_configuration_untouched() {
    let mut engine = make_engine(4);
    engine.take_request();
    let before = engine.config().clone();

    assert!(!engine.apply_theme(OfflineTheme.suggest_theme("calm")));
    assert!(!engine.apply_theme(FixedTheme("{not json").suggest_theme("calm")));
    assert!(!engine.apply_theme(
        FixedTheme(r##"{"color":"#zzzzzz","shape":"heart"}"##).suggest_theme("calm")
    ));

    assert_eq!(engine.config(), &before);
    assert!(engine.take_request().is_none());
}

#[test]
fn theme_size_overrides_point_size() {
    let mut engine = make_engine(4);
    let spec = ThemeSpec::from_json(r##"{"color":"#00ff00","shape":"flower","size":0.4}"##);
    assert!(engine.apply_theme(spec));
    let v = engine.step(&signal(0.0));
    assert!((v.point_size - 0.4).abs() < 1e-6);
}
