//! Per-session score and blink-rate history.

use serde::{Deserialize, Serialize};

/// Append-only record of every scored frame in a session.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    scores: Vec<f64>,
    blink_rates: Vec<f64>,
}

/// End-of-session statistics derived from the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames: u64,
    /// Mean score, 0 when nothing was recorded.
    pub average_score: f64,
    /// Mean blink rate, 0 when nothing was recorded.
    pub average_blink_rate: f64,
    /// Score at the last recorded frame (100 when nothing was recorded).
    pub final_score: f64,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame's post-update score and blink rate.
    pub fn record(&mut self, score: f64, blink_rate: usize) {
        self.scores.push(score);
        self.blink_rates.push(blink_rate as f64);
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn blink_rates(&self) -> &[f64] {
        &self.blink_rates
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn average_score(&self) -> f64 {
        mean(&self.scores)
    }

    pub fn average_blink_rate(&self) -> f64 {
        mean(&self.blink_rates)
    }

    /// Summarize the history. `current_score` is reported as the final
    /// score so an empty session still ends at the scorer's value.
    pub fn summarize(&self, current_score: f64) -> SessionSummary {
        SessionSummary {
            frames: self.len() as u64,
            average_score: self.average_score(),
            average_blink_rate: self.average_blink_rate(),
            final_score: self.scores.last().copied().unwrap_or(current_score),
        }
    }

    pub fn clear(&mut self) {
        self.scores.clear();
        self.blink_rates.clear();
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_averages_zero() {
        let history = SessionHistory::new();
        let summary = history.summarize(100.0);
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.average_blink_rate, 0.0);
        assert_eq!(summary.final_score, 100.0);
    }

    #[test]
    fn test_average_of_recorded_scores() {
        let mut history = SessionHistory::new();
        history.record(80.0, 10);
        history.record(90.0, 12);
        history.record(100.0, 14);

        let summary = history.summarize(100.0);
        assert_eq!(summary.frames, 3);
        assert!((summary.average_score - 90.0).abs() < 1e-9);
        assert!((summary.average_blink_rate - 12.0).abs() < 1e-9);
        assert_eq!(summary.final_score, 100.0);
    }

    #[test]
    fn test_clear() {
        let mut history = SessionHistory::new();
        history.record(50.0, 1);
        history.clear();
        assert!(history.is_empty());
        assert!(history.blink_rates().is_empty());
    }
}
