//! RGB/HSL colour helpers operating in normalized [0, 1] channel space.

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex colour `{0}`")]
    InvalidHex(String),
}

/// Linear RGB triple with each channel in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb(Vec3::new(r, g, b).clamp(Vec3::ZERO, Vec3::ONE))
    }

    pub fn from_array(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let s = hex.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        let bad = || ColorError::InvalidHex(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let (r, g, b) = match digits.len() {
            6 => (
                u8::from_str_radix(&digits[0..2], 16).map_err(|_| bad())?,
                u8::from_str_radix(&digits[2..4], 16).map_err(|_| bad())?,
                u8::from_str_radix(&digits[4..6], 16).map_err(|_| bad())?,
            ),
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                (nib(0)?, nib(1)?, nib(2)?)
            }
            _ => return Err(bad()),
        };
        Ok(Rgb(Vec3::new(r as f32, g as f32, b as f32) / 255.0))
    }

    pub fn to_hex(self) -> String {
        let c = (self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
    }

    /// Returns `(h, s, l)`, all in [0, 1].
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let Vec3 { x: r, y: g, z: b } = self.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) * 0.5;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l <= 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    /// Build from HSL; hue wraps modulo 1, saturation and lightness clamp to [0, 1].
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Rgb(Vec3::splat(l));
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    pub fn offset_hsl(self, dh: f32, ds: f32, dl: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h + dh, s + ds, l + dl)
    }

    /// Multiply every channel, saturating at 1.
    pub fn scale(self, k: f32) -> Self {
        Rgb((self.0 * k).clamp(Vec3::ZERO, Vec3::ONE))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
