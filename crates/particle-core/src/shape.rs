//! Procedural point clouds for each selectable shape.
//!
//! Every shape is a plain function with the same signature, picked by a single
//! `match` in [`ShapeRequest::generate`]. Generators draw from the caller's
//! random source, so two calls with identical inputs give different clouds
//! unless the caller reseeds.

use crate::color::Rgb;
use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shape {
    Heart,
    Star,
    Flower,
    Tree,
    Planet,
    Firework,
    #[default]
    Random,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Heart,
        Shape::Star,
        Shape::Flower,
        Shape::Tree,
        Shape::Planet,
        Shape::Firework,
        Shape::Random,
    ];

    /// Parse a shape identifier. Unknown names select the uniform cube fill.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "heart" => Shape::Heart,
            "star" => Shape::Star,
            "flower" => Shape::Flower,
            "tree" => Shape::Tree,
            "planet" | "saturn" => Shape::Planet,
            "firework" | "fireworks" => Shape::Firework,
            _ => Shape::Random,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Heart => "heart",
            Shape::Star => "star",
            Shape::Flower => "flower",
            Shape::Tree => "tree",
            Shape::Planet => "planet",
            Shape::Firework => "firework",
            Shape::Random => "random",
        }
    }

    /// Shapes that hold a fixed upright orientation instead of spinning.
    pub fn holds_upright(self) -> bool {
        matches!(self, Shape::Tree)
    }
}

/// Canonical (unscaled) positions plus matching per-point colours.
#[derive(Clone, Debug, Default)]
pub struct ShapeCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl ShapeCloud {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        }
    }

    fn push(&mut self, pos: Vec3, color: Rgb) {
        self.positions.push(pos);
        self.colors.push(color.0);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything that determines a regenerated cloud besides the particle count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeRequest {
    pub shape: Shape,
    pub base_color: Rgb,
    /// Fireworks only: full-spectrum streaks instead of hue shifts of the base colour.
    pub rainbow: bool,
}

impl ShapeRequest {
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> ShapeCloud {
        let build: fn(&mut R, &ShapeRequest, usize) -> ShapeCloud = match self.shape {
            Shape::Heart => heart::<R>,
            Shape::Star => star::<R>,
            Shape::Flower => flower::<R>,
            Shape::Tree => tree::<R>,
            Shape::Planet => planet::<R>,
            Shape::Firework => firework::<R>,
            Shape::Random => cube::<R>,
        };
        build(rng, self, count)
    }
}

pub fn generate<R: Rng + ?Sized>(
    shape: Shape,
    base_color: Rgb,
    count: usize,
    rng: &mut R,
) -> ShapeCloud {
    ShapeRequest {
        shape,
        base_color,
        rainbow: false,
    }
    .generate(count, rng)
}

/// Uniform sample in [-amount, amount].
#[inline]
fn spread<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * amount
}

/// Uniform direction on the unit sphere (inverse-cosine latitude).
#[inline]
fn unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

fn heart<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        let u = rng.gen::<f32>() * TAU;
        let v = rng.gen::<f32>() * TAU;
        // cube root pushes mass outward so the filled interior reads as solid
        let volume = rng.gen::<f32>().cbrt();
        let x = 16.0 * u.sin().powi(3);
        let y = 13.0 * u.cos() - 5.0 * (2.0 * u).cos() - 2.0 * (3.0 * u).cos() - (4.0 * u).cos();
        let z = v.sin() * HEART_DEPTH * (1.0 - volume * 0.5) * u.sin().abs();
        let pos = Vec3::new(x * HEART_SCALE * volume, y * HEART_SCALE * volume, z);
        let color = req.base_color.offset_hsl(
            spread(rng, HEART_HUE_JITTER),
            0.0,
            spread(rng, HEART_LIGHTNESS_JITTER),
        );
        cloud.push(pos, color);
    }
    cloud
}

fn star<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let sector = TAU / STAR_POINTS as f32;
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        let theta = rng.gen::<f32>() * TAU;
        // 0 at the tip (sector centre), 1 at the valley between tips
        let edge = ((theta % sector) / sector - 0.5).abs() * 2.0;
        let outline = STAR_OUTER_RADIUS - (STAR_OUTER_RADIUS - STAR_INNER_RADIUS) * edge;
        let r = outline * rng.gen::<f32>().sqrt();
        let thickness = STAR_DEPTH * (1.0 - r / STAR_OUTER_RADIUS);
        let a = theta + FRAC_PI_2 - sector * 0.5;
        let pos = Vec3::new(r * a.cos(), r * a.sin(), spread(rng, thickness * 0.5));
        let brightness = STAR_BRIGHTNESS_MIN + rng.gen::<f32>() * STAR_BRIGHTNESS_SPAN;
        cloud.push(pos, req.base_color.scale(brightness));
    }
    cloud
}

fn flower<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        let theta = rng.gen::<f32>() * TAU;
        let r = FLOWER_RADIUS * (FLOWER_PETALS * theta).cos();
        let a = theta + spread(rng, FLOWER_ANGLE_JITTER);
        let pos = Vec3::new(r * a.cos(), r * a.sin(), spread(rng, FLOWER_DEPTH * 0.5));
        // petal tips slightly lighter than the centre
        let color = req
            .base_color
            .offset_hsl(0.0, 0.0, (r.abs() / FLOWER_RADIUS - 0.5) * 0.2);
        cloud.push(pos, color);
    }
    cloud
}

fn tree<R: Rng + ?Sized>(rng: &mut R, _req: &ShapeRequest, count: usize) -> ShapeCloud {
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        let roll = rng.gen::<f32>();
        if roll < TREE_TRUNK_P {
            let a = rng.gen::<f32>() * TAU;
            let r = TREE_TRUNK_RADIUS * rng.gen::<f32>().sqrt();
            let y = TREE_TRUNK_BOTTOM + rng.gen::<f32>() * TREE_TRUNK_HEIGHT;
            cloud.push(
                Vec3::new(r * a.cos(), y, r * a.sin()),
                Rgb::from_array(TREE_TRUNK_COLOR),
            );
            continue;
        }
        if roll < TREE_TRUNK_P + TREE_TOP_STAR_P {
            let r = TREE_TOP_STAR_RADIUS * rng.gen::<f32>().cbrt();
            let pos = unit_sphere(rng) * r + Vec3::new(0.0, TREE_TOP_STAR_Y, 0.0);
            cloud.push(pos, Rgb::from_array(TREE_STAR_COLOR));
            continue;
        }

        let (base_y, height, base_radius) = TREE_TIERS[rng.gen_range(0..TREE_TIERS.len())];
        let h = rng.gen::<f32>();
        let max_r = base_radius * (1.0 - h);
        let r = max_r * rng.gen::<f32>().sqrt();
        let a = rng.gen::<f32>() * TAU;
        let pos = Vec3::new(r * a.cos(), base_y + h * height, r * a.sin());

        let color = if r > TREE_SURFACE_RATIO * max_r && rng.gen::<f32>() < TREE_ORNAMENT_P {
            let pick = rng.gen_range(0..TREE_ORNAMENT_COLORS.len());
            Rgb::from_array(TREE_ORNAMENT_COLORS[pick])
        } else if rng.gen::<f32>() < TREE_SNOW_P {
            Rgb::from_array(TREE_SNOW_COLOR)
        } else {
            let [r0, g0, b0] = TREE_PINE_COLOR;
            Rgb::new(
                r0 + spread(rng, TREE_PINE_NOISE),
                g0 + spread(rng, TREE_PINE_NOISE),
                b0 + spread(rng, TREE_PINE_NOISE),
            )
        };
        cloud.push(pos, color);
    }
    cloud
}

fn planet<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let core_color = req.base_color.scale(PLANET_CORE_DIM);
    let ring_color = req
        .base_color
        .offset_hsl(PLANET_RING_HUE_SHIFT, 0.0, PLANET_RING_LIGHTEN);
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        if rng.gen::<f32>() < PLANET_CORE_P {
            cloud.push(unit_sphere(rng) * PLANET_RADIUS, core_color);
        } else {
            let a = rng.gen::<f32>() * TAU;
            let r = PLANET_RING_INNER + rng.gen::<f32>() * (PLANET_RING_OUTER - PLANET_RING_INNER);
            let depth = r * a.sin();
            let pos = Vec3::new(
                r * a.cos(),
                depth * PLANET_RING_SQUASH_Y,
                depth * PLANET_RING_SQUASH_Z,
            );
            cloud.push(pos, ring_color);
        }
    }
    cloud
}

fn firework<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let mut cloud = ShapeCloud::with_capacity(count);
    let mut heading = Vec3::Y;
    let mut color = req.base_color;
    for i in 0..count {
        if i % FIREWORK_STREAK_LEN == 0 {
            let streak = (i / FIREWORK_STREAK_LEN) as f32;
            heading = unit_sphere(rng);
            color = if req.rainbow {
                Rgb::from_hsl(streak * FIREWORK_RAINBOW_HUE_STEP, 1.0, 0.6)
            } else {
                req.base_color
                    .offset_hsl(streak * FIREWORK_STREAK_HUE_STEP, 0.0, 0.0)
            };
        }
        let radius = rng.gen::<f32>().powf(FIREWORK_RADIUS_EXPONENT) * FIREWORK_RADIUS;
        let wobble = Vec3::new(spread(rng, 0.08), spread(rng, 0.08), spread(rng, 0.08));
        let dir = (heading + wobble).try_normalize().unwrap_or(heading);
        cloud.push(dir * radius, color);
    }
    cloud
}

fn cube<R: Rng + ?Sized>(rng: &mut R, req: &ShapeRequest, count: usize) -> ShapeCloud {
    let mut cloud = ShapeCloud::with_capacity(count);
    for _ in 0..count {
        let pos = Vec3::new(
            spread(rng, CUBE_SIZE * 0.5),
            spread(rng, CUBE_SIZE * 0.5),
            spread(rng, CUBE_SIZE * 0.5),
        );
        cloud.push(pos, req.base_color);
    }
    cloud
}
