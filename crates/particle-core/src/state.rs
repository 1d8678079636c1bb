//! Camera and viewport state shared with the native frontend.
//!
//! These types avoid referencing platform-specific APIs. The frontend feeds
//! window resizes into [`Viewport`] and reads the camera matrices each frame.

use crate::constants::{CAMERA_FOVY_DEG, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("viewport size {width}x{height} is empty")]
    EmptyViewport { width: u32, height: u32 },
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Ease the eye's x/y toward `goal`, keeping z and re-aiming at the origin.
    pub fn follow(&mut self, goal: Vec2, weight: f32) {
        let eye = self.eye.truncate();
        let next = eye + (goal - eye) * weight.clamp(0.0, 1.0);
        self.eye = next.extend(self.eye.z);
        self.target = Vec3::ZERO;
    }
}

/// Render-target dimensions plus the camera whose aspect tracks them.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut vp = Self {
            width: 1,
            height: 1,
            camera: Camera::default(),
        };
        vp.resize(width, height)?;
        Ok(vp)
    }

    /// Update target dimensions and camera aspect. Particle buffers are untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyViewport { width, height });
        }
        self.width = width;
        self.height = height;
        self.camera.aspect = width as f32 / height as f32;
        log::debug!("[surface] resized to {width}x{height}");
        Ok(())
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.projection_matrix() * self.camera.view_matrix()
    }
}
