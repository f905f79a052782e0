//! Dual-threshold focus alerts.
//!
//! The critical alert fires once when the score drops below the critical
//! threshold and suppresses the ordinary alert. The ordinary alert fires
//! once when the score drops below the alert threshold and neither has
//! fired. Both re-arm only after the score recovers to the alert threshold.

use serde::{Deserialize, Serialize};

/// Severity of a fired alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Ordinary,
    Critical,
}

impl AlertLevel {
    /// Notification text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Ordinary => "Your focus is dropping. Take a moment to refocus.",
            Self::Critical => "Focus critically low. Consider taking a short break.",
        }
    }
}

/// An alert fired while processing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub level: AlertLevel,
    pub score: f64,
    pub timestamp_ms: f64,
}

/// Tracks which alerts have fired since the score last recovered.
#[derive(Debug, Clone, Default)]
pub struct AlertMonitor {
    warned: bool,
    critical_warned: bool,
    last_score: Option<f64>,
    ordinary_count: u32,
    critical_count: u32,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the current score. Nothing happens unless the score
    /// changed since the previous evaluation.
    pub fn evaluate(
        &mut self,
        score: f64,
        alert_threshold: f64,
        critical_threshold: f64,
    ) -> Option<AlertLevel> {
        if self.last_score == Some(score) {
            return None;
        }
        self.last_score = Some(score);

        if score < critical_threshold && !self.critical_warned {
            self.critical_warned = true;
            self.critical_count += 1;
            return Some(AlertLevel::Critical);
        }
        if score < alert_threshold && !self.warned && !self.critical_warned {
            self.warned = true;
            self.ordinary_count += 1;
            return Some(AlertLevel::Ordinary);
        }
        if score >= alert_threshold {
            self.warned = false;
            self.critical_warned = false;
        }
        None
    }

    pub fn warned(&self) -> bool {
        self.warned
    }

    pub fn critical_warned(&self) -> bool {
        self.critical_warned
    }

    /// Ordinary alerts fired since the last reset.
    pub fn ordinary_count(&self) -> u32 {
        self.ordinary_count
    }

    /// Critical alerts fired since the last reset.
    pub fn critical_count(&self) -> u32 {
        self.critical_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_fires_once() {
        let mut monitor = AlertMonitor::new();
        assert_eq!(monitor.evaluate(59.0, 60.0, 30.0), Some(AlertLevel::Ordinary));
        assert_eq!(monitor.evaluate(58.0, 60.0, 30.0), None);
        assert_eq!(monitor.evaluate(45.0, 60.0, 30.0), None);
        assert_eq!(monitor.ordinary_count(), 1);
    }

    #[test]
    fn test_critical_after_ordinary() {
        let mut monitor = AlertMonitor::new();
        monitor.evaluate(50.0, 60.0, 30.0);
        assert_eq!(monitor.evaluate(29.9, 60.0, 30.0), Some(AlertLevel::Critical));
        assert_eq!(monitor.evaluate(10.0, 60.0, 30.0), None);
    }

    #[test]
    fn test_critical_suppresses_ordinary() {
        let mut monitor = AlertMonitor::new();
        // straight past both thresholds
        assert_eq!(monitor.evaluate(20.0, 60.0, 30.0), Some(AlertLevel::Critical));
        // climbing back between thresholds does not fire ordinary
        assert_eq!(monitor.evaluate(45.0, 60.0, 30.0), None);
        assert_eq!(monitor.ordinary_count(), 0);
    }

    #[test]
    fn test_recovery_rearms_both() {
        let mut monitor = AlertMonitor::new();
        monitor.evaluate(20.0, 60.0, 30.0);
        monitor.evaluate(60.0, 60.0, 30.0);
        assert!(!monitor.warned() && !monitor.critical_warned());

        assert_eq!(monitor.evaluate(55.0, 60.0, 30.0), Some(AlertLevel::Ordinary));
    }

    #[test]
    fn test_unchanged_score_is_ignored() {
        let mut monitor = AlertMonitor::new();
        monitor.evaluate(50.0, 60.0, 30.0);
        monitor.reset();
        monitor.evaluate(50.0, 60.0, 30.0);
        // same value again: no evaluation
        assert_eq!(monitor.evaluate(50.0, 60.0, 30.0), None);
        assert_eq!(monitor.ordinary_count(), 1);
    }
}
