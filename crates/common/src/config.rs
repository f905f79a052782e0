//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{MedfocusError, MedfocusResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where session reports are stored.
    pub reports_dir: PathBuf,

    /// Target frame rate of the focus tracking loop (Hz).
    pub frame_rate_hz: u32,

    /// Focus scoring thresholds and penalties.
    #[serde(default)]
    pub focus: FocusSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tunable thresholds and penalties for the focus scorer.
///
/// None of the geometric thresholds are validated constants; they are
/// starting points that users adjust from the settings editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    /// Score below which the ordinary alert fires.
    pub alert_threshold: f64,

    /// Score below which the critical alert fires.
    pub critical_threshold: f64,

    /// Minimum acceptable blinks per blink window.
    pub min_blink_rate: f64,

    /// Maximum acceptable blinks per blink window.
    pub max_blink_rate: f64,

    /// Per-frame penalty while the blink rate is out of band.
    pub blink_penalty: f64,

    /// Per-frame penalty while not looking at the screen.
    pub gaze_penalty: f64,

    /// Per-frame penalty while slouching.
    pub posture_penalty: f64,

    /// Eye aspect ratio below which the eye counts as closed.
    pub ear_threshold: f64,

    /// Lower bound of the acceptable gaze offset band.
    pub gaze_min: f64,

    /// Upper bound of the acceptable gaze offset band.
    pub gaze_max: f64,

    /// Head tilt (degrees from vertical) above which posture is flagged.
    pub posture_angle_threshold: f64,

    /// Minimum vertical rise of the head above the shoulder line
    /// (normalized units). When set, slouching also requires the head
    /// to sit lower than this. `None` uses the angle alone.
    pub posture_head_rise_min: Option<f64>,

    /// Trailing window for blink counting (seconds).
    pub blink_window_secs: f64,

    /// Time after session start before blink rate is penalized (seconds).
    pub grace_period_secs: f64,

    /// Score recovered on a frame with no penalty.
    pub recovery_increment: f64,

    /// Score lost on a frame with no pose landmarks.
    pub no_pose_decay: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "medfocus=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reports_dir: dirs_default_reports(),
            frame_rate_hz: 30,
            focus: FocusSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            alert_threshold: 60.0,
            critical_threshold: 30.0,
            min_blink_rate: 8.0,
            max_blink_rate: 30.0,
            blink_penalty: 0.05,
            gaze_penalty: 0.10,
            posture_penalty: 0.08,
            ear_threshold: 0.21,
            gaze_min: -2.0,
            gaze_max: 8.0,
            posture_angle_threshold: 20.0,
            posture_head_rise_min: Some(0.12),
            blink_window_secs: 60.0,
            grace_period_secs: 60.0,
            recovery_increment: 0.05,
            no_pose_decay: 0.01,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl FocusSettings {
    /// Names accepted by [`FocusSettings::apply_edit`].
    pub const KEYS: &'static [&'static str] = &[
        "alert_threshold",
        "critical_threshold",
        "min_blink_rate",
        "max_blink_rate",
        "blink_penalty",
        "gaze_penalty",
        "posture_penalty",
        "ear_threshold",
        "gaze_min",
        "gaze_max",
        "posture_angle_threshold",
        "posture_head_rise_min",
        "blink_window_secs",
        "grace_period_secs",
        "recovery_increment",
        "no_pose_decay",
    ];

    /// Check cross-field consistency and value ranges.
    pub fn validate(&self) -> MedfocusResult<()> {
        let finite = [
            ("alert_threshold", self.alert_threshold),
            ("critical_threshold", self.critical_threshold),
            ("min_blink_rate", self.min_blink_rate),
            ("max_blink_rate", self.max_blink_rate),
            ("blink_penalty", self.blink_penalty),
            ("gaze_penalty", self.gaze_penalty),
            ("posture_penalty", self.posture_penalty),
            ("ear_threshold", self.ear_threshold),
            ("gaze_min", self.gaze_min),
            ("gaze_max", self.gaze_max),
            ("posture_angle_threshold", self.posture_angle_threshold),
            ("blink_window_secs", self.blink_window_secs),
            ("grace_period_secs", self.grace_period_secs),
            ("recovery_increment", self.recovery_increment),
            ("no_pose_decay", self.no_pose_decay),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(MedfocusError::validation(field, "must be a finite number"));
            }
        }

        for (field, value) in [
            ("alert_threshold", self.alert_threshold),
            ("critical_threshold", self.critical_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(MedfocusError::validation(field, "must be within [0, 100]"));
            }
        }
        if self.critical_threshold > self.alert_threshold {
            return Err(MedfocusError::validation(
                "critical_threshold",
                "must not exceed alert_threshold",
            ));
        }

        for (field, value) in [
            ("min_blink_rate", self.min_blink_rate),
            ("blink_penalty", self.blink_penalty),
            ("gaze_penalty", self.gaze_penalty),
            ("posture_penalty", self.posture_penalty),
            ("ear_threshold", self.ear_threshold),
            ("grace_period_secs", self.grace_period_secs),
            ("recovery_increment", self.recovery_increment),
            ("no_pose_decay", self.no_pose_decay),
        ] {
            if value < 0.0 {
                return Err(MedfocusError::validation(field, "must not be negative"));
            }
        }
        if self.min_blink_rate > self.max_blink_rate {
            return Err(MedfocusError::validation(
                "max_blink_rate",
                "must not be below min_blink_rate",
            ));
        }
        if self.blink_window_secs <= 0.0 {
            return Err(MedfocusError::validation(
                "blink_window_secs",
                "must be positive",
            ));
        }
        if self.gaze_min > self.gaze_max {
            return Err(MedfocusError::validation(
                "gaze_max",
                "must not be below gaze_min",
            ));
        }
        if !(0.0..=180.0).contains(&self.posture_angle_threshold) {
            return Err(MedfocusError::validation(
                "posture_angle_threshold",
                "must be within [0, 180] degrees",
            ));
        }
        if let Some(rise) = self.posture_head_rise_min {
            if !rise.is_finite() {
                return Err(MedfocusError::validation(
                    "posture_head_rise_min",
                    "must be a finite number",
                ));
            }
        }
        Ok(())
    }

    /// Apply a single edited field given as raw text.
    ///
    /// The edit is only committed when it parses and the resulting settings
    /// still validate. On rejection the previous value stays in place.
    pub fn apply_edit(&mut self, key: &str, raw: &str) -> MedfocusResult<()> {
        let mut candidate = self.clone();
        candidate.set_field(key, raw.trim())?;

        if let Err(e) = candidate.validate() {
            tracing::warn!(key, raw, error = %e, "Rejected settings edit, keeping previous value");
            return Err(e);
        }

        *self = candidate;
        tracing::debug!(key, raw, "Settings edit applied");
        Ok(())
    }

    fn set_field(&mut self, key: &str, raw: &str) -> MedfocusResult<()> {
        if key == "posture_head_rise_min" {
            self.posture_head_rise_min = match raw {
                "" | "none" | "off" => None,
                _ => Some(parse_number(key, raw)?),
            };
            return Ok(());
        }

        let value = parse_number(key, raw)?;
        let slot = match key {
            "alert_threshold" => &mut self.alert_threshold,
            "critical_threshold" => &mut self.critical_threshold,
            "min_blink_rate" => &mut self.min_blink_rate,
            "max_blink_rate" => &mut self.max_blink_rate,
            "blink_penalty" => &mut self.blink_penalty,
            "gaze_penalty" => &mut self.gaze_penalty,
            "posture_penalty" => &mut self.posture_penalty,
            "ear_threshold" => &mut self.ear_threshold,
            "gaze_min" => &mut self.gaze_min,
            "gaze_max" => &mut self.gaze_max,
            "posture_angle_threshold" => &mut self.posture_angle_threshold,
            "blink_window_secs" => &mut self.blink_window_secs,
            "grace_period_secs" => &mut self.grace_period_secs,
            "recovery_increment" => &mut self.recovery_increment,
            "no_pose_decay" => &mut self.no_pose_decay,
            _ => {
                return Err(MedfocusError::validation(key, "unknown setting"));
            }
        };
        *slot = value;
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> MedfocusResult<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            tracing::warn!(key, raw, "Rejected settings edit, keeping previous value");
            Err(MedfocusError::validation(
                key,
                format!("'{raw}' is not a number"),
            ))
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.focus.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!(
                                "Invalid focus settings in {:?}: {}; using defaults",
                                config_path,
                                e
                            );
                            return Self {
                                focus: FocusSettings::default(),
                                ..config
                            };
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("medfocus").join("config.json")
}

/// Default session reports directory.
fn dirs_default_reports() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("medfocus").join("sessions")
}
