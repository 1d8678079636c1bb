//! Per-frame animation of the particle field toward the active shape.

use crate::color::Rgb;
use crate::constants::DEFAULT_COLOR;
use crate::field::{FieldError, ParticleField};
use crate::gesture::GestureSignal;
use crate::shape::{Shape, ShapeCloud, ShapeRequest};
use crate::state::{SurfaceError, Viewport};
use crate::theme::{ThemeError, ThemeSpec};
use glam::{Mat4, Vec2};
use rand::prelude::*;

/// Mapping from openness to scale, approach speed, spin and point appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationParams {
    pub base_scale: f32,
    pub expansion_exponent: f32,
    pub expansion_range: f32,
    pub lerp_base: f32,
    pub lerp_gain: f32,
    pub jitter_threshold: f32,
    pub jitter_amplitude: f32,
    pub base_rotation_speed: f32, // radians per frame
    pub rotation_gain: f32,
    pub pitch_ratio: f32,
    pub upright_damping: f32,
    pub upright_epsilon: f32,
    pub size_base: f32,
    pub size_gain: f32,
    pub opacity_base: f32,
    pub opacity_gain: f32,
    pub follow_weight: f32,
    pub follow_gain: f32,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            base_scale: 1.2,
            expansion_exponent: 2.0,
            expansion_range: 10.8,
            lerp_base: 0.08,
            lerp_gain: 0.12,
            jitter_threshold: 0.8,
            jitter_amplitude: 0.05,
            base_rotation_speed: 0.002,
            rotation_gain: 0.02,
            pitch_ratio: 0.35,
            upright_damping: 0.9,
            upright_epsilon: 1e-3,
            size_base: 0.15,
            size_gain: 0.2,
            opacity_base: 0.55,
            opacity_gain: 0.4,
            follow_weight: 0.08,
            follow_gain: 3.0,
        }
    }
}

impl AnimationParams {
    /// Convex, increasing: small pinches barely move, full openness spreads wide.
    pub fn expansion(&self, openness: f32) -> f32 {
        self.base_scale + openness.powf(self.expansion_exponent) * self.expansion_range
    }

    pub fn lerp_rate(&self, openness: f32) -> f32 {
        self.lerp_base + openness * self.lerp_gain
    }

    pub fn spin(&self, openness: f32) -> f32 {
        self.base_rotation_speed + openness * self.rotation_gain
    }

    /// `base_override` replaces `size_base` (a theme may pin the resting size).
    pub fn point_size(&self, base_override: Option<f32>, openness: f32) -> f32 {
        base_override.unwrap_or(self.size_base) + openness * self.size_gain
    }

    pub fn opacity(&self, openness: f32) -> f32 {
        (self.opacity_base + openness * self.opacity_gain).clamp(0.0, 1.0)
    }
}

/// Active configuration chosen from outside the loop (keys, theme service).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub shape: Shape,
    pub color: Rgb,
    pub rainbow: bool,
    /// Overrides `AnimationParams::size_base` when set.
    pub point_size: Option<f32>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Heart,
            color: Rgb::from_array(DEFAULT_COLOR),
            rainbow: false,
            point_size: None,
        }
    }
}

impl FieldConfig {
    pub fn request(&self) -> ShapeRequest {
        ShapeRequest {
            shape: self.shape,
            base_color: self.color,
            rainbow: self.rainbow,
        }
    }
}

/// Values the renderer needs for one frame besides the particle buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameVisuals {
    pub expansion: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub model: Mat4,
    pub view_proj: Mat4,
}

/// The animation loop: owns the field, the active configuration and the camera.
///
/// Configuration changes queue a [`ShapeRequest`]; the host hands it to a
/// generator (inline via [`Engine::regenerate_now`] or a background worker)
/// and installs the result with [`Engine::install`]. Until then the loop keeps
/// animating toward whatever cloud is installed.
pub struct Engine<R: Rng = StdRng> {
    pub params: AnimationParams,
    field: ParticleField,
    config: FieldConfig,
    pending: Option<ShapeRequest>,
    rotation: Vec2, // (yaw, pitch)
    viewport: Viewport,
    rng: R,
}

impl<R: Rng> Engine<R> {
    pub fn new(capacity: usize, config: FieldConfig, viewport: Viewport, rng: R) -> Self {
        log::info!(
            "[field] capacity={} shape={} color={}",
            capacity,
            config.shape.name(),
            config.color.to_hex()
        );
        Self {
            params: AnimationParams::default(),
            field: ParticleField::new(capacity),
            pending: Some(config.request()),
            config,
            rotation: Vec2::ZERO,
            viewport,
            rng,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.viewport.resize(width, height)
    }

    fn reconfigure(&mut self, next: FieldConfig) -> bool {
        if next == self.config {
            return false;
        }
        let regenerate = next.request() != self.config.request();
        self.config = next;
        if regenerate {
            log::info!(
                "[field] regenerate shape={} color={} rainbow={}",
                self.config.shape.name(),
                self.config.color.to_hex(),
                self.config.rainbow
            );
            self.pending = Some(self.config.request());
        }
        true
    }

    pub fn set_shape(&mut self, shape: Shape) -> bool {
        self.reconfigure(FieldConfig {
            shape,
            ..self.config.clone()
        })
    }

    pub fn set_color(&mut self, color: Rgb) -> bool {
        self.reconfigure(FieldConfig {
            color,
            ..self.config.clone()
        })
    }

    pub fn set_rainbow(&mut self, rainbow: bool) -> bool {
        self.reconfigure(FieldConfig {
            rainbow,
            ..self.config.clone()
        })
    }

    /// Apply a theme-service result. Failures leave the configuration untouched
    /// and return false.
    pub fn apply_theme(&mut self, result: Result<ThemeSpec, ThemeError>) -> bool {
        match result {
            Ok(theme) => {
                log::info!(
                    "[theme] shape={} color={}",
                    theme.shape.name(),
                    theme.color.to_hex()
                );
                self.reconfigure(FieldConfig {
                    shape: theme.shape,
                    color: theme.color,
                    point_size: theme.size.or(self.config.point_size),
                    ..self.config.clone()
                })
            }
            Err(e) => {
                log::warn!("[theme] suggestion ignored: {e}");
                false
            }
        }
    }

    /// Take the most recent regeneration request, if any.
    pub fn take_request(&mut self) -> Option<ShapeRequest> {
        self.pending.take()
    }

    pub fn install(&mut self, cloud: ShapeCloud) -> Result<(), FieldError> {
        self.field.install(cloud)
    }

    /// Generate and install any pending request on the calling thread.
    pub fn regenerate_now(&mut self) -> Result<bool, FieldError> {
        let Some(req) = self.pending.take() else {
            return Ok(false);
        };
        let cloud = req.generate(self.field.capacity(), &mut self.rng);
        self.field.install(cloud)?;
        Ok(true)
    }

    /// Advance one rendered frame using the latest gesture snapshot.
    pub fn step(&mut self, signal: &GestureSignal) -> FrameVisuals {
        let openness = if signal.openness.is_finite() {
            signal.openness.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let p = &self.params;

        let expansion = p.expansion(openness);
        self.field.retarget(expansion);
        if self.field.approach(p.lerp_rate(openness)) && openness > p.jitter_threshold {
            self.field.jitter(p.jitter_amplitude, &mut self.rng);
        }

        if self.config.shape.holds_upright() {
            self.rotation *= p.upright_damping;
            if self.rotation.x.abs() < p.upright_epsilon {
                self.rotation.x = 0.0;
            }
            if self.rotation.y.abs() < p.upright_epsilon {
                self.rotation.y = 0.0;
            }
        } else {
            let spin = p.spin(openness);
            self.rotation.x += spin;
            self.rotation.y += spin * p.pitch_ratio;
        }

        if signal.position.is_finite() {
            let goal = signal.position.truncate() * p.follow_gain;
            self.viewport.camera.follow(goal, p.follow_weight);
        }

        FrameVisuals {
            expansion,
            point_size: p.point_size(self.config.point_size, openness),
            opacity: p.opacity(openness),
            yaw: self.rotation.x,
            pitch: self.rotation.y,
            model: Mat4::from_rotation_y(self.rotation.x) * Mat4::from_rotation_x(self.rotation.y),
            view_proj: self.viewport.view_proj(),
        }
    }
}
