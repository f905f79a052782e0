//! Blink detection from the eye aspect ratio.
//!
//! A blink is recorded on the frame where the averaged EAR climbs back to
//! or above the threshold after at least [`CONSECUTIVE_FRAMES_MIN`]
//! sub-threshold frames. Blink timestamps are kept in a trailing window;
//! the number retained is the blink rate.

use std::collections::VecDeque;

use medfocus_landmark_model::indices::face;
use medfocus_landmark_model::landmark::Landmark;

use crate::geometry::calculate_ear;

/// Sub-threshold frames required before the eye reopening counts as a blink.
pub const CONSECUTIVE_FRAMES_MIN: u32 = 1;

/// Mean EAR of both eyes, or `None` if either eye is degenerate.
pub fn average_ear(face_landmarks: &[Landmark]) -> Option<f64> {
    let left = calculate_ear(face_landmarks, &face::LEFT_EYE)?;
    let right = calculate_ear(face_landmarks, &face::RIGHT_EYE)?;
    Some((left + right) / 2.0)
}

/// Outcome of feeding one frame to the [`BlinkTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkUpdate {
    /// A blink was recorded on this frame.
    pub blinked: bool,
    /// The eye is below the EAR threshold on this frame.
    pub is_blinking: bool,
    /// Blinks inside the trailing window after pruning.
    pub rate: usize,
}

/// Consecutive-frame blink counter with a trailing timestamp window.
#[derive(Debug, Clone)]
pub struct BlinkTracker {
    window_ms: f64,
    counter: u32,
    timestamps: VecDeque<f64>,
}

impl BlinkTracker {
    /// Create a tracker keeping blinks from the last `window_secs` seconds.
    pub fn new(window_secs: f64) -> Self {
        Self {
            window_ms: window_secs * 1000.0,
            counter: 0,
            timestamps: VecDeque::new(),
        }
    }

    /// Feed one frame's averaged EAR.
    ///
    /// `None` is a neutral frame (no face, or degenerate eye geometry): the
    /// consecutive-frame counter is left alone and only pruning happens.
    pub fn update(&mut self, ear: Option<f64>, threshold: f64, now_ms: f64) -> BlinkUpdate {
        let mut blinked = false;
        let mut is_blinking = false;

        if let Some(ear) = ear {
            if ear < threshold {
                self.counter += 1;
                is_blinking = true;
            } else {
                if self.counter >= CONSECUTIVE_FRAMES_MIN {
                    self.timestamps.push_back(now_ms);
                    blinked = true;
                    tracing::trace!(at_ms = now_ms, frames = self.counter, "Blink recorded");
                }
                self.counter = 0;
            }
        }

        self.prune(now_ms);

        BlinkUpdate {
            blinked,
            is_blinking,
            rate: self.rate(),
        }
    }

    /// Drop blink timestamps older than the trailing window.
    pub fn prune(&mut self, now_ms: f64) {
        let cutoff = now_ms - self.window_ms;
        while let Some(&front) = self.timestamps.front() {
            if front < cutoff {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Blinks currently inside the window.
    pub fn rate(&self) -> usize {
        self.timestamps.len()
    }

    /// Current consecutive sub-threshold frame count.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Retained blink timestamps, oldest first.
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.timestamps.iter().copied()
    }

    /// Change the window length. Takes effect at the next prune.
    pub fn set_window_secs(&mut self, window_secs: f64) {
        self.window_ms = window_secs * 1000.0;
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Clear the counter and all recorded blinks.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.timestamps.clear();
    }
}
