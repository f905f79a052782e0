//! Clock and timing utilities for focus sessions.
//!
//! A session records the wall-clock time it started for its report. Scoring
//! itself runs on frame timestamps, and [`FrameGate`] makes sure one video
//! frame is scored at most once.

/// Wall-clock anchor of a focus session.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// Wall-clock time at session start (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert milliseconds to seconds.
    pub fn ms_to_secs(ms: f64) -> f64 {
        ms / 1000.0
    }
}

/// Skips frames whose timestamp has already been processed.
///
/// The host display loop can fire several times for the same decoded
/// video frame; only the first call for a given timestamp is admitted.
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    last_timestamp_ms: Option<f64>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records the timestamp if it differs from the last
    /// admitted frame. The first call always returns true.
    pub fn admit(&mut self, timestamp_ms: f64) -> bool {
        match self.last_timestamp_ms {
            Some(last) if last == timestamp_ms => false,
            _ => {
                self.last_timestamp_ms = Some(timestamp_ms);
                true
            }
        }
    }

    /// Timestamp of the last admitted frame.
    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    /// Forget the last admitted frame.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}
