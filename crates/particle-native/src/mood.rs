//! Offline theme suggestions keyed on words in the mood text.

use particle_core::{ThemeError, ThemeService, ThemeSpec};

/// `(keywords, theme payload)`; the first entry with a matching word wins.
const PRESETS: &[(&[&str], &str)] = &[
    (&["love", "romantic", "sweet"], r##"{"color":"#ff3366","shape":"heart"}"##),
    (&["happy", "excited", "party", "celebrate"], r##"{"color":"#ffd700","shape":"firework","size":0.2}"##),
    (&["calm", "relaxed", "peaceful"], r##"{"color":"#33ccff","shape":"flower"}"##),
    (&["festive", "christmas", "winter", "cozy"], r##"{"color":"#7cff6b","shape":"tree"}"##),
    (&["dreamy", "curious", "space"], r##"{"color":"#b266ff","shape":"planet"}"##),
    (&["proud", "bright", "confident"], r##"{"color":"#ffffff","shape":"star"}"##),
];

/// Keyword table standing in for a remote suggestion service.
#[derive(Clone, Copy, Debug, Default)]
pub struct PresetThemes;

impl ThemeService for PresetThemes {
    fn suggest_theme(&self, mood: &str) -> Result<ThemeSpec, ThemeError> {
        let mood = mood.to_ascii_lowercase();
        let words: Vec<&str> = mood
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        PRESETS
            .iter()
            .find(|(keys, _)| keys.iter().any(|k| words.contains(k)))
            .map(|(_, payload)| ThemeSpec::from_json(payload))
            .unwrap_or_else(|| Err(ThemeError::Unavailable(format!("no preset for mood {mood:?}"))))
    }
}
