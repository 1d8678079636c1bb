use crate::shape::ShapeCloud;
use glam::Vec3;
use rand::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("shape cloud has {got} points but the field holds {expected}")]
    CapacityMismatch { expected: usize, got: usize },
}

/// Fixed-capacity particle buffers.
///
/// `live`, `target` and `colors` always have the same length, set once in
/// [`ParticleField::new`]. Only values change afterwards.
#[derive(Clone, Debug)]
pub struct ParticleField {
    live: Vec<Vec3>,
    target: Vec<Vec3>,
    colors: Vec<Vec3>,
    /// Unscaled shape geometry; `None` until the first cloud is installed.
    base: Option<Vec<Vec3>>,
}

impl ParticleField {
    pub fn new(capacity: usize) -> Self {
        Self {
            live: vec![Vec3::ZERO; capacity],
            target: vec![Vec3::ZERO; capacity],
            colors: vec![Vec3::ONE; capacity],
            base: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.live.len()
    }

    pub fn live(&self) -> &[Vec3] {
        &self.live
    }

    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn has_shape(&self) -> bool {
        self.base.is_some()
    }

    /// Replace shape geometry and colours wholesale. Live positions are kept so
    /// particles glide from the old shape into the new one.
    pub fn install(&mut self, cloud: ShapeCloud) -> Result<(), FieldError> {
        let expected = self.capacity();
        for got in [cloud.positions.len(), cloud.colors.len()] {
            if got != expected {
                return Err(FieldError::CapacityMismatch { expected, got });
            }
        }
        self.colors = cloud.colors;
        self.base = Some(cloud.positions);
        Ok(())
    }

    /// Scale the installed geometry into `target`. No-op before the first install.
    pub fn retarget(&mut self, expansion: f32) {
        if let Some(base) = &self.base {
            for (t, b) in self.target.iter_mut().zip(base) {
                *t = *b * expansion;
            }
        }
    }

    /// Move every live point a fraction `rate` of the way to its target.
    ///
    /// Returns false (and leaves `live` untouched) before the first install.
    pub fn approach(&mut self, rate: f32) -> bool {
        if self.base.is_none() {
            return false;
        }
        let rate = rate.clamp(0.0, 1.0);
        for (l, t) in self.live.iter_mut().zip(&self.target) {
            *l += (*t - *l) * rate;
        }
        true
    }

    /// Random x/y kick of up to `amplitude` per axis; z is left alone.
    pub fn jitter<R: Rng + ?Sized>(&mut self, amplitude: f32, rng: &mut R) {
        for l in &mut self.live {
            l.x += (rng.gen::<f32>() * 2.0 - 1.0) * amplitude;
            l.y += (rng.gen::<f32>() * 2.0 - 1.0) * amplitude;
        }
    }
}
