//! Single-slot handoff between the detector callback and the render loop.
//!
//! The detector thread calls [`GestureFeed::submit`] at its own cadence; the
//! render loop calls [`GestureFeed::latest`] once per frame and always gets a
//! complete [`GestureSignal`] copy. Intermediate samples are never queued:
//! each submit replaces the previous value.
//!
//! If the detector goes silent for longer than the silence timeout the reader
//! side keeps applying "no hand" steps, one per idle interval, so the signal
//! decays to its idle defaults instead of freezing.

use crate::constants::{DETECTOR_IDLE_STEP_MS, DETECTOR_SILENCE_TIMEOUT_MS};
use crate::gesture::{Conditioner, ConditionerProfile, GestureSignal, LandmarkFrame};
use instant::Instant;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

struct FeedState {
    conditioner: Conditioner,
    last_seen: Instant,
    last_idle_step: Instant,
}

#[derive(Clone)]
pub struct GestureFeed {
    inner: Arc<Mutex<FeedState>>,
    silence_timeout: Duration,
    idle_step: Duration,
}

impl GestureFeed {
    pub fn new(profile: ConditionerProfile, now: Instant) -> Self {
        let silence_timeout = Duration::from_millis(DETECTOR_SILENCE_TIMEOUT_MS);
        Self {
            inner: Arc::new(Mutex::new(FeedState {
                conditioner: Conditioner::new(profile),
                last_seen: now,
                last_idle_step: now + silence_timeout,
            })),
            silence_timeout,
            idle_step: Duration::from_millis(DETECTOR_IDLE_STEP_MS),
        }
    }

    pub fn with_timing(mut self, silence_timeout: Duration, idle_step: Duration) -> Self {
        self.silence_timeout = silence_timeout;
        self.idle_step = idle_step.max(Duration::from_millis(1));
        {
            let mut st = self.lock();
            let first_step = st.last_seen + silence_timeout;
            st.last_idle_step = first_step;
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        // a panicked writer leaves a complete signal behind; keep using it
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Detector callback: fold one sample (or "no hand") and publish the result.
    pub fn submit(&self, sample: Option<&LandmarkFrame>, now: Instant) -> GestureSignal {
        let mut st = self.lock();
        st.last_seen = now;
        // idle steps are counted from the end of the timeout, not from the sample
        st.last_idle_step = now + self.silence_timeout;
        st.conditioner.update(sample)
    }

    /// Most recent signal, decayed toward idle if the detector has gone quiet.
    pub fn latest(&self, now: Instant) -> GestureSignal {
        let mut st = self.lock();
        if now.saturating_duration_since(st.last_seen) > self.silence_timeout {
            let mut steps = 0u32;
            while now.saturating_duration_since(st.last_idle_step) >= self.idle_step {
                st.last_idle_step += self.idle_step;
                st.conditioner.update(None);
                steps += 1;
            }
            if steps > 0 {
                log::trace!("[gesture] detector silent, applied {steps} idle steps");
            }
        }
        st.conditioner.signal()
    }
}
