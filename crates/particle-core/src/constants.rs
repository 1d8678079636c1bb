// Shared shape/motion tuning constants used by the engine and the native frontend.

// Field capacity
pub const DEFAULT_PARTICLE_COUNT: usize = 25_000;
pub const MIN_PARTICLE_COUNT: usize = 1_000;
pub const MAX_PARTICLE_COUNT: usize = 30_000;

// Default base colour (gold) and the palette cycled by the frontend
pub const DEFAULT_COLOR_HEX: &str = "#ffd700";
pub const DEFAULT_COLOR: [f32; 3] = [1.0, 215.0 / 255.0, 0.0];
pub const PALETTE_HEX: [&str; 6] = [
    "#ffd700", // gold
    "#ff3366", // rose
    "#33ccff", // sky
    "#7cff6b", // lime
    "#b266ff", // violet
    "#ffffff", // white
];

// Heart
pub const HEART_SCALE: f32 = 0.15; // parametric curve units to world units
pub const HEART_DEPTH: f32 = 1.5; // max z extrusion at the thickest point
pub const HEART_HUE_JITTER: f32 = 0.05;
pub const HEART_LIGHTNESS_JITTER: f32 = 0.1;

// Star
pub const STAR_POINTS: usize = 5;
pub const STAR_INNER_RADIUS: f32 = 2.0;
pub const STAR_OUTER_RADIUS: f32 = 5.0;
pub const STAR_DEPTH: f32 = 1.2; // z thickness at the centre, tapering to 0 at the tips
pub const STAR_BRIGHTNESS_MIN: f32 = 0.7;
pub const STAR_BRIGHTNESS_SPAN: f32 = 0.5;

// Flower
pub const FLOWER_PETALS: f32 = 5.0;
pub const FLOWER_RADIUS: f32 = 3.5;
pub const FLOWER_ANGLE_JITTER: f32 = 0.15; // radians
pub const FLOWER_DEPTH: f32 = 0.6;

// Tree: category probabilities (cumulative thresholds)
pub const TREE_TRUNK_P: f32 = 0.05;
pub const TREE_TOP_STAR_P: f32 = 0.02;
pub const TREE_ORNAMENT_P: f32 = 0.12;
pub const TREE_SNOW_P: f32 = 0.05;
pub const TREE_SURFACE_RATIO: f32 = 0.85; // radius fraction counted as tier surface

pub const TREE_TRUNK_RADIUS: f32 = 0.45;
pub const TREE_TRUNK_BOTTOM: f32 = -5.0;
pub const TREE_TRUNK_HEIGHT: f32 = 1.6;
pub const TREE_TOP_STAR_Y: f32 = 5.3;
pub const TREE_TOP_STAR_RADIUS: f32 = 0.35;

/// Stacked cone tiers as `(base_y, height, base_radius)`, widest at the bottom.
pub const TREE_TIERS: [(f32, f32, f32); 3] = [(-3.6, 4.0, 4.0), (-1.0, 3.6, 3.0), (1.6, 3.4, 2.0)];

pub const TREE_TRUNK_COLOR: [f32; 3] = [0.40, 0.24, 0.10]; // brown
pub const TREE_STAR_COLOR: [f32; 3] = [1.0, 0.84, 0.0]; // gold
pub const TREE_PINE_COLOR: [f32; 3] = [0.05, 0.45, 0.16];
pub const TREE_PINE_NOISE: f32 = 0.08;
pub const TREE_SNOW_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const TREE_ORNAMENT_COLORS: [[f32; 3]; 4] = [
    [0.95, 0.10, 0.15], // red
    [1.0, 0.80, 0.10],  // gold
    [0.20, 0.45, 1.0],  // blue
    [0.85, 0.85, 0.92], // silver
];

// Planet
pub const PLANET_CORE_P: f32 = 0.7;
pub const PLANET_RADIUS: f32 = 3.0;
pub const PLANET_CORE_DIM: f32 = 0.9;
pub const PLANET_RING_INNER: f32 = 5.0;
pub const PLANET_RING_OUTER: f32 = 7.0;
pub const PLANET_RING_SQUASH_Y: f32 = 0.15; // ring tilt out of the xz plane
pub const PLANET_RING_SQUASH_Z: f32 = 0.8;
pub const PLANET_RING_HUE_SHIFT: f32 = 0.08;
pub const PLANET_RING_LIGHTEN: f32 = 0.15;

// Firework
pub const FIREWORK_RADIUS: f32 = 8.0;
pub const FIREWORK_RADIUS_EXPONENT: f32 = 0.2; // < 1 biases points toward the outer shell
pub const FIREWORK_STREAK_LEN: usize = 150;
pub const FIREWORK_STREAK_HUE_STEP: f32 = 0.04;
pub const FIREWORK_RAINBOW_HUE_STEP: f32 = 0.137;

// Uniform cube fallback
pub const CUBE_SIZE: f32 = 10.0;

// Camera
pub const CAMERA_Z: f32 = 25.0;
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 200.0;

// Detector cadence used by the silence watchdog
pub const DETECTOR_SILENCE_TIMEOUT_MS: u64 = 500;
pub const DETECTOR_IDLE_STEP_MS: u64 = 33;
