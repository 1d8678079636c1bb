//! Mood-to-theme suggestions from an external service.

use crate::color::{ColorError, Rgb};
use crate::shape::Shape;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed theme payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("invalid point size {0}")]
    InvalidSize(f32),
}

/// A theme suggestion, applied to the active configuration in one step.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSpec {
    pub color: Rgb,
    pub shape: Shape,
    pub size: Option<f32>,
}

#[derive(Deserialize)]
struct RawTheme {
    color: String,
    shape: String,
    #[serde(default)]
    size: Option<f32>,
}

impl ThemeSpec {
    /// Parse `{ "color": "#rrggbb", "shape": "star", "size": 0.2 }`.
    ///
    /// Unknown shape names fall back to the uniform fill; a bad colour or
    /// non-positive size makes the whole payload invalid.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let raw: RawTheme = serde_json::from_str(json)?;
        let size = match raw.size {
            Some(s) if !(s.is_finite() && s > 0.0) => {
                return Err(ThemeError::InvalidSize(s))
            }
            other => other,
        };
        Ok(Self {
            color: Rgb::from_hex(&raw.color)?,
            shape: Shape::from_name(&raw.shape),
            size,
        })
    }
}

/// Black-box service turning a free-text mood into a theme.
pub trait ThemeService {
    fn suggest_theme(&self, mood: &str) -> Result<ThemeSpec, ThemeError>;
}
