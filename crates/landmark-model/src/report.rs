//! Persisted focus session reports.
//!
//! A report is written when a session ends. It freezes the end-of-session
//! averages together with the settings the session ran with, so later
//! comparisons stay meaningful after the user retunes thresholds.

use std::path::{Path, PathBuf};

use medfocus_common::config::FocusSettings;
use serde::{Deserialize, Serialize};

/// File name of a report inside its directory.
pub const REPORT_FILE: &str = "report.json";

/// Top-level report file (`report.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Schema version.
    pub version: String,

    /// Unique report identifier.
    pub id: String,

    /// Session start (RFC 3339).
    pub started_at: String,

    /// Session end (RFC 3339).
    pub ended_at: String,

    /// End-of-session statistics.
    pub summary: ReportSummary,

    /// Settings in effect while the session ran.
    pub settings: FocusSettings,
}

/// End-of-session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Frames that went through the scorer.
    pub frames: u64,

    /// Mean of the per-frame scores (0 when no frames were scored).
    pub average_score: f64,

    /// Mean of the per-frame blink rates (0 when no frames were scored).
    pub average_blink_rate: f64,

    /// Score when the session ended.
    pub final_score: f64,

    /// Session length in seconds.
    pub duration_secs: f64,

    /// Ordinary alerts fired.
    #[serde(default)]
    pub ordinary_alerts: u32,

    /// Critical alerts fired.
    #[serde(default)]
    pub critical_alerts: u32,
}

impl SessionReport {
    /// Create a report stamped with a fresh id.
    pub fn new(
        started_at: impl Into<String>,
        summary: ReportSummary,
        settings: FocusSettings,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            id: uuid_v4(),
            started_at: started_at.into(),
            ended_at: chrono::Utc::now().to_rfc3339(),
            summary,
            settings,
        }
    }

    /// Load a report from its directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = dir.as_ref().join(REPORT_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| ReportError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let report: SessionReport =
            serde_json::from_str(&json).map_err(|e| ReportError::ParseError {
                path: path.clone(),
                source: e,
            })?;
        report.validate()?;
        Ok(report)
    }

    /// Save the report into `dir`, creating it if needed. Returns the file path.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| ReportError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ReportError::IoError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Reject reports whose statistics are out of range.
    pub fn validate(&self) -> Result<(), ReportError> {
        let s = &self.summary;
        for (name, value) in [
            ("average_score", s.average_score),
            ("final_score", s.final_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReportError::ValidationError {
                    message: format!("{name} {value} outside [0, 100]"),
                });
            }
        }
        if !(s.average_blink_rate.is_finite() && s.average_blink_rate >= 0.0) {
            return Err(ReportError::ValidationError {
                message: format!("average_blink_rate {} is invalid", s.average_blink_rate),
            });
        }
        if !(s.duration_secs.is_finite() && s.duration_secs >= 0.0) {
            return Err(ReportError::ValidationError {
                message: format!("duration_secs {} is invalid", s.duration_secs),
            });
        }
        Ok(())
    }
}

/// Errors that can occur when working with reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid report: {message}")]
    ValidationError { message: String },
}

/// Generate a time-seeded v4-shaped identifier without an external dependency.
///
/// A process-wide counter is folded into the node group so ids created in
/// the same nanosecond still differ.
fn uuid_v4() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) as u128;
    let node = ((seed >> 16) ^ (count << 24) ^ count) & 0xFFFF_FFFF_FFFF;
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFF_FFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3FFF) | 0x8000) as u16,
        node,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ReportSummary {
        ReportSummary {
            frames: 3,
            average_score: 90.0,
            average_blink_rate: 12.0,
            final_score: 100.0,
            duration_secs: 0.1,
            ordinary_alerts: 1,
            critical_alerts: 0,
        }
    }

    #[test]
    fn test_report_creation() {
        let report = SessionReport::new("2026-01-01T00:00:00Z", summary(), FocusSettings::default());
        assert_eq!(report.version, "1.0");
        assert_eq!(report.id.len(), 36);
        assert_eq!(report.started_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_report_ids_differ() {
        let ids: std::collections::HashSet<String> = (0..64).map(|_| uuid_v4()).collect();
        assert_eq!(ids.len(), 64);

        let nodes: std::collections::HashSet<String> = ids
            .iter()
            .filter_map(|id| id.rsplit('-').next().map(str::to_string))
            .collect();
        assert!(nodes.len() > 1);
    }

    #[test]
    fn test_report_save_load_roundtrip() {
        let dir = std::env::temp_dir().join("medfocus_test_report_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);

        let report = SessionReport::new("2026-01-01T00:00:00Z", summary(), FocusSettings::default());
        let path = report.save(&dir).unwrap();
        assert!(path.ends_with(REPORT_FILE));

        let loaded = SessionReport::load(&dir).unwrap();
        assert_eq!(loaded, report);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_out_of_range_score() {
        let dir = std::env::temp_dir().join("medfocus_test_report_invalid");
        let _ = std::fs::remove_dir_all(&dir);

        let mut report =
            SessionReport::new("2026-01-01T00:00:00Z", summary(), FocusSettings::default());
        report.summary.average_score = 140.0;
        report.save(&dir).unwrap();

        let err = SessionReport::load(&dir).unwrap_err();
        assert!(matches!(err, ReportError::ValidationError { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_report() {
        let err = SessionReport::load("/nonexistent/medfocus/report").unwrap_err();
        assert!(matches!(err, ReportError::IoError { .. }));
    }
}
