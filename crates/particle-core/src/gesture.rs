//! Turns raw per-frame hand landmarks into a smoothed openness scalar and palm position.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

// Landmark indices in the 21-point hand topology emitted by the detector.
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const PALM_CENTER: usize = 9;
pub const HAND_LANDMARKS: usize = 21;

/// One detector sample: normalized image-space landmarks, x/y in [0, 1], y growing downward.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub points: SmallVec<[Vec3; HAND_LANDMARKS]>,
}

impl LandmarkFrame {
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Finite x/y of a named landmark, or `None` if absent or malformed.
    pub fn point(&self, index: usize) -> Option<Vec2> {
        let p = self.points.get(index)?.truncate();
        p.is_finite().then_some(p)
    }
}

/// Latest conditioned gesture state. Copied by value across the detector/render boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSignal {
    pub is_open: bool,
    pub openness: f32,
    pub position: Vec3,
}

impl GestureSignal {
    pub fn idle(profile: &ConditionerProfile) -> Self {
        Self {
            is_open: false,
            openness: profile.idle_openness,
            position: Vec3::ZERO,
        }
    }
}

/// Calibration and smoothing constants for one detector setup.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionerProfile {
    /// Pinch distance mapped to openness 0.
    pub pinch_closed: f32,
    /// Pinch distance mapped to openness 1.
    pub pinch_open: f32,
    /// Weight on the new sample: `new = old * (1 - w) + raw * w`.
    pub smoothing: f32,
    pub open_threshold: f32,
    pub idle_openness: f32,
    /// Per-sample weight pulling openness toward `idle_openness` when no hand is seen.
    pub idle_weight: f32,
    /// Per-sample position retention when no hand is seen.
    pub position_retention: f32,
    /// World units per half image extent on each axis.
    pub world_scale: Vec2,
}

impl Default for ConditionerProfile {
    fn default() -> Self {
        Self {
            pinch_closed: 0.04,
            pinch_open: 0.22,
            smoothing: 0.25,
            open_threshold: 0.40,
            idle_openness: 0.25,
            idle_weight: 0.05,
            position_retention: 0.95,
            world_scale: Vec2::new(8.0, 6.0),
        }
    }
}

impl ConditionerProfile {
    /// Snappier profile: narrower pinch range, heavier weight on new samples.
    pub fn responsive() -> Self {
        Self {
            pinch_open: 0.21,
            smoothing: 0.30,
            open_threshold: 0.45,
            idle_openness: 0.30,
            ..Self::default()
        }
    }

    /// Linear map of a raw pinch distance onto [0, 1], clamped at both ends.
    pub fn map_pinch(&self, distance: f32) -> f32 {
        let span = (self.pinch_open - self.pinch_closed).max(f32::EPSILON);
        ((distance - self.pinch_closed) / span).clamp(0.0, 1.0)
    }

    /// Recentre a normalized image point to world x/y with y pointing up.
    pub fn to_world(&self, p: Vec2) -> Vec3 {
        let centred = (p - Vec2::splat(0.5)) * 2.0;
        Vec3::new(
            centred.x * self.world_scale.x,
            -centred.y * self.world_scale.y,
            0.0,
        )
    }
}

/// Single-pole low-pass filter over detector samples.
#[derive(Clone, Debug)]
pub struct Conditioner {
    pub profile: ConditionerProfile,
    signal: GestureSignal,
}

impl Conditioner {
    pub fn new(profile: ConditionerProfile) -> Self {
        let signal = GestureSignal::idle(&profile);
        Self { profile, signal }
    }

    pub fn signal(&self) -> GestureSignal {
        self.signal
    }

    /// Fold one detector sample (or its absence) into the signal.
    ///
    /// A frame missing any of the thumb tip, index tip or palm centre counts
    /// as "no hand" for that sample.
    pub fn update(&mut self, sample: Option<&LandmarkFrame>) -> GestureSignal {
        let hand = sample.and_then(|f| {
            Some((
                f.point(THUMB_TIP)?,
                f.point(INDEX_TIP)?,
                f.point(PALM_CENTER)?,
            ))
        });
        match hand {
            Some((thumb, index, palm)) => self.observe_hand(thumb.distance(index), palm),
            None => self.decay_idle(),
        }
        self.signal
    }

    fn observe_hand(&mut self, pinch: f32, palm: Vec2) {
        let p = &self.profile;
        let raw = p.map_pinch(pinch);
        let w = p.smoothing;
        let openness = self.signal.openness * (1.0 - w) + raw * w;
        let position = self.signal.position.lerp(p.to_world(palm), w);
        self.signal = GestureSignal {
            is_open: openness > p.open_threshold,
            openness,
            position,
        };
    }

    fn decay_idle(&mut self) {
        let p = &self.profile;
        let openness =
            self.signal.openness + (p.idle_openness - self.signal.openness) * p.idle_weight;
        self.signal = GestureSignal {
            is_open: false,
            openness,
            position: self.signal.position * p.position_retention,
        };
    }
}

impl Default for Conditioner {
    fn default() -> Self {
        Self::new(ConditionerProfile::default())
    }
}
