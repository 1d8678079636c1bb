//! Newline-delimited JSON feed from an external hand tracker on stdin.
//!
//! ```text
//! {"type":"hand","landmarks":[[0.51,0.62,0.0], ...]}
//! {"type":"no_hand"}
//! {"type":"theme","color":"#ff0000","shape":"star","size":0.2}
//! {"type":"mood","text":"calm and sleepy"}
//! ```
//!
//! Mood lines are resolved through a [`ThemeService`] on the reader thread so a
//! slow service never stalls the render loop.

use glam::Vec3;
use instant::Instant;
use particle_core::{GestureFeed, LandmarkFrame, ThemeError, ThemeService, ThemeSpec};
use serde::Deserialize;
use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread;

#[derive(Debug)]
pub enum DetectorEvent {
    Sample(Option<LandmarkFrame>),
    Theme(Result<ThemeSpec, ThemeError>),
    Mood(String),
}

/// A landmark as `[x, y]` or `[x, y, z]`; a missing z reads as 0.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireLandmark {
    Xyz([f32; 3]),
    Xy([f32; 2]),
}

impl From<WireLandmark> for Vec3 {
    fn from(l: WireLandmark) -> Self {
        match l {
            WireLandmark::Xyz(p) => Vec3::from(p),
            WireLandmark::Xy([x, y]) => Vec3::new(x, y, 0.0),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireMessage {
    Hand { landmarks: Vec<WireLandmark> },
    NoHand {},
    Theme {},
    Mood { text: String },
}

/// Decode one line. Anything unreadable counts as "no hand" for that sample.
pub fn parse_line(line: &str) -> DetectorEvent {
    match serde_json::from_str::<WireMessage>(line) {
        Ok(WireMessage::Hand { landmarks }) => DetectorEvent::Sample(Some(LandmarkFrame::new(
            landmarks.into_iter().map(Vec3::from),
        ))),
        Ok(WireMessage::NoHand {}) => DetectorEvent::Sample(None),
        Ok(WireMessage::Theme {}) => DetectorEvent::Theme(ThemeSpec::from_json(line)),
        Ok(WireMessage::Mood { text }) => DetectorEvent::Mood(text),
        Err(e) => {
            log::debug!("[gesture] unreadable detector line: {e}");
            DetectorEvent::Sample(None)
        }
    }
}

/// Read detector lines on a background thread until stdin closes.
///
/// Samples go straight into `feed`; theme payloads, and moods resolved by
/// `service`, are forwarded to the render loop.
pub fn spawn_stdin_reader<S>(
    feed: GestureFeed,
    service: S,
    themes: Sender<Result<ThemeSpec, ThemeError>>,
) -> std::io::Result<thread::JoinHandle<()>>
where
    S: ThemeService + Send + 'static,
{
    thread::Builder::new()
        .name("detector-feed".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        log::warn!("[gesture] detector feed read error: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let theme = match parse_line(&line) {
                    DetectorEvent::Sample(sample) => {
                        feed.submit(sample.as_ref(), Instant::now());
                        continue;
                    }
                    DetectorEvent::Theme(theme) => theme,
                    DetectorEvent::Mood(text) => {
                        log::info!("[theme] asking for a theme for mood {text:?}");
                        service.suggest_theme(&text)
                    }
                };
                if themes.send(theme).is_err() {
                    break;
                }
            }
            log::info!("[gesture] detector feed closed; signal will settle to idle");
        })
}
