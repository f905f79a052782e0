//! Focus session management.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use medfocus_common::clock::SessionClock;
use medfocus_common::config::{AppConfig, FocusSettings};
use medfocus_common::error::{MedfocusError, MedfocusResult};
use medfocus_landmark_model::frame::FrameStreamHeader;
use medfocus_landmark_model::report::{ReportSummary, SessionReport};
use medfocus_scoring::alerts::{AlertEvent, AlertMonitor};
use medfocus_scoring::{FocusScorer, FrameResult};
use medfocus_vision_core::{CameraInfo, CameraSource, CameraStatus, LandmarkDetector};
use tokio::sync::broadcast;
use tokio::time::{Duration, MissedTickBehavior};

use crate::alerts::AlertSink;
use crate::writer::ResultWriter;

/// Capacity of the per-frame result channel. Slow subscribers skip ahead.
const RESULT_CHANNEL_CAPACITY: usize = 256;

/// Configuration for a focus session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Scoring thresholds and penalties.
    pub settings: FocusSettings,

    /// Frame loop rate. 0 processes frames as fast as the camera yields them.
    pub frame_rate_hz: u32,

    /// Optional JSONL file receiving every [`FrameResult`].
    pub results_path: Option<PathBuf>,

    /// Directory under which a report is saved when the session ends.
    pub reports_dir: Option<PathBuf>,
}

impl SessionConfig {
    /// Session configuration from the persisted application config.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            settings: config.focus.clone(),
            frame_rate_hz: config.frame_rate_hz,
            results_path: None,
            reports_dir: Some(config.reports_dir.clone()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settings: FocusSettings::default(),
            frame_rate_hz: 30,
            results_path: None,
            reports_dir: None,
        }
    }
}

/// State of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, or a start attempt failed.
    NotStarted,
    /// Scoring frames.
    Running,
    /// Camera released, summary computed.
    Ended,
}

/// What happened on one tick of the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was scored; `alert` is set when it raised one.
    Scored {
        result: FrameResult,
        alert: Option<AlertEvent>,
    },
    /// A frame arrived but was not scored (detector not ready, detection
    /// failed, or the frame repeated the previous timestamp).
    Skipped,
    /// The camera had no new frame.
    NoFrame,
}

/// A focus session that owns the camera stream while running.
pub struct FocusSession {
    config: SessionConfig,
    state: SessionState,
    camera: Box<dyn CameraSource>,
    camera_status: CameraStatus,
    camera_info: Option<CameraInfo>,
    detector: Box<dyn LandmarkDetector>,
    scorer: FocusScorer,
    alerts: AlertMonitor,
    sinks: Vec<Box<dyn AlertSink>>,
    clock: Option<SessionClock>,
    writer: Option<ResultWriter>,
    results_tx: broadcast::Sender<FrameResult>,
    stop_flag: Arc<AtomicBool>,
    last_timestamp_ms: Option<f64>,
    report: Option<SessionReport>,
}

impl FocusSession {
    pub fn new(
        config: SessionConfig,
        camera: Box<dyn CameraSource>,
        detector: Box<dyn LandmarkDetector>,
    ) -> Self {
        let (results_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        Self {
            scorer: FocusScorer::new(config.settings.clone()),
            config,
            state: SessionState::NotStarted,
            camera,
            camera_status: CameraStatus::Closed,
            camera_info: None,
            detector,
            alerts: AlertMonitor::new(),
            sinks: Vec::new(),
            clock: None,
            writer: None,
            results_tx,
            stop_flag: Arc::new(AtomicBool::new(false)),
            last_timestamp_ms: None,
            report: None,
        }
    }

    /// Register an alert sink. Sinks survive across sessions.
    pub fn add_alert_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Subscribe to per-frame results.
    pub fn subscribe(&self) -> broadcast::Receiver<FrameResult> {
        self.results_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn camera_status(&self) -> CameraStatus {
        self.camera_status
    }

    pub fn camera_info(&self) -> Option<&CameraInfo> {
        self.camera_info.as_ref()
    }

    pub fn score(&self) -> f64 {
        self.scorer.score()
    }

    pub fn scorer(&self) -> &FocusScorer {
        &self.scorer
    }

    pub fn settings(&self) -> &FocusSettings {
        &self.config.settings
    }

    /// Report of the most recently ended session. Kept across restarts.
    pub fn last_report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// Apply new settings. A running session picks them up on the next frame.
    pub fn set_settings(&mut self, settings: FocusSettings) -> MedfocusResult<()> {
        settings.validate()?;
        self.scorer.set_settings(settings.clone());
        self.config.settings = settings;
        tracing::info!("Focus settings updated");
        Ok(())
    }

    /// Start (or restart) the session.
    ///
    /// A running session is ended first, so its report is produced before
    /// the new one begins. Any stream still held is released. If the camera
    /// cannot be opened the session does not enter `Running` and the error
    /// is returned as-is; no retry is attempted.
    pub fn start(&mut self) -> MedfocusResult<CameraInfo> {
        if self.state == SessionState::Running {
            tracing::info!("Ending running session before restart");
            if let Err(e) = self.end() {
                tracing::warn!(error = %e, "Failed to finalize previous session");
            }
        }
        if self.camera.is_open() {
            tracing::info!(camera = %self.camera.name(), "Releasing previous camera stream");
            self.camera.stop_all_tracks();
            self.camera_status = CameraStatus::Closed;
        }

        let info = match self.camera.open() {
            Ok(info) => info,
            Err(e) => {
                self.camera_status = match &e {
                    MedfocusError::PermissionDenied { .. } => CameraStatus::Denied,
                    MedfocusError::Unsupported { .. } => CameraStatus::Unsupported,
                    _ => CameraStatus::Closed,
                };
                tracing::warn!(error = %e, status = ?self.camera_status, "Camera unavailable, session not started");
                return Err(e);
            }
        };

        self.scorer = FocusScorer::new(self.config.settings.clone());
        self.alerts.reset();
        self.last_timestamp_ms = None;
        self.stop_flag.store(false, Ordering::SeqCst);

        let clock = SessionClock::start();
        self.writer = match &self.config.results_path {
            Some(path) => {
                let header = FrameStreamHeader {
                    epoch_wall: clock.epoch_wall().to_string(),
                    ..FrameStreamHeader::new(self.detector.name(), info.frame_rate_hz)
                };
                match ResultWriter::new(path, &header) {
                    Ok(writer) => Some(writer),
                    Err(e) => {
                        self.camera.stop_all_tracks();
                        self.camera_status = CameraStatus::Closed;
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        tracing::info!(
            camera = %info.name,
            detector = %self.detector.name(),
            epoch_wall = %clock.epoch_wall(),
            "Focus session started"
        );

        self.clock = Some(clock);
        self.camera_status = CameraStatus::Open;
        self.camera_info = Some(info.clone());
        self.state = SessionState::Running;
        Ok(info)
    }

    /// Pull one frame from the camera and score it.
    pub fn process_next_frame(&mut self) -> MedfocusResult<FrameOutcome> {
        if self.state != SessionState::Running {
            return Err(MedfocusError::session("Session not running"));
        }

        let Some(video) = self.camera.next_frame()? else {
            return Ok(FrameOutcome::NoFrame);
        };

        if !self.detector.is_ready() {
            tracing::trace!(sequence = video.sequence, "Detector not ready, skipping frame");
            return Ok(FrameOutcome::Skipped);
        }

        let landmarks = match self.detector.detect(&video) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                tracing::warn!(sequence = video.sequence, error = %e, "Landmark detection failed");
                return Ok(FrameOutcome::Skipped);
            }
        };

        let Some(result) = self.scorer.process(&landmarks) else {
            return Ok(FrameOutcome::Skipped);
        };
        self.last_timestamp_ms = Some(result.timestamp_ms);

        if let Some(writer) = self.writer.as_mut() {
            writer.write_result(&result)?;
        }
        // no subscribers is fine
        let _ = self.results_tx.send(result);

        let settings = &self.config.settings;
        let alert = self
            .alerts
            .evaluate(result.score, settings.alert_threshold, settings.critical_threshold)
            .map(|level| AlertEvent {
                level,
                score: result.score,
                timestamp_ms: result.timestamp_ms,
            });
        if let Some(event) = alert.as_ref() {
            for sink in &mut self.sinks {
                sink.notify(event);
            }
        }

        Ok(FrameOutcome::Scored { result, alert })
    }

    /// Run the frame loop until the stop flag is set or the camera closes.
    ///
    /// One frame is processed per tick; the next tick is only scheduled
    /// once the current frame is done. Returns the number of scored frames.
    pub async fn run_frame_loop(&mut self) -> MedfocusResult<u64> {
        if self.state != SessionState::Running {
            return Err(MedfocusError::session("Session not running"));
        }

        let mut interval = (self.config.frame_rate_hz > 0).then(|| {
            let period = Duration::from_secs_f64(1.0 / self.config.frame_rate_hz as f64);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        tracing::info!(frame_rate_hz = self.config.frame_rate_hz, "Frame loop started");
        let mut scored = 0u64;

        while !self.stop_flag.load(Ordering::Relaxed) {
            match interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            match self.process_next_frame()? {
                FrameOutcome::Scored { .. } => scored += 1,
                FrameOutcome::Skipped => {}
                FrameOutcome::NoFrame => {
                    if !self.camera.is_open() {
                        tracing::info!("Camera stream ended");
                        break;
                    }
                }
            }
        }

        tracing::info!(frames = scored, "Frame loop stopped");
        Ok(scored)
    }

    /// Signal the frame loop to stop after the current frame.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Stop flag for coordinating from another task.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// End the session: release the camera, compute the summary, and save
    /// the report when a reports directory is configured.
    ///
    /// The session is `Ended` once the camera is released, even if flushing
    /// results or saving the report fails afterwards.
    pub fn end(&mut self) -> MedfocusResult<SessionReport> {
        if self.state != SessionState::Running {
            return Err(MedfocusError::session("Session not running"));
        }

        self.stop_flag.store(true, Ordering::SeqCst);
        self.camera.stop_all_tracks();
        self.camera_status = CameraStatus::Closed;
        self.state = SessionState::Ended;

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            tracing::info!(
                results = writer.results_written(),
                path = %writer.path().display(),
                "Frame results written"
            );
        }

        let summary = self.scorer.summary();
        let duration_secs = match (self.scorer.started_at_ms(), self.last_timestamp_ms) {
            (Some(first), Some(last)) => SessionClock::ms_to_secs(last - first),
            _ => 0.0,
        };
        let report_summary = ReportSummary {
            frames: summary.frames,
            average_score: summary.average_score,
            average_blink_rate: summary.average_blink_rate,
            final_score: summary.final_score,
            duration_secs,
            ordinary_alerts: self.alerts.ordinary_count(),
            critical_alerts: self.alerts.critical_count(),
        };

        let started_at = self
            .clock
            .as_ref()
            .map(|c| c.epoch_wall().to_string())
            .unwrap_or_default();
        let report = SessionReport::new(started_at, report_summary, self.config.settings.clone());

        if let Some(dir) = &self.config.reports_dir {
            let path = report
                .save(dir.join(&report.id))
                .map_err(|e| MedfocusError::session(format!("Failed to save report: {e}")))?;
            tracing::info!(path = %path.display(), "Session report saved");
        }

        tracing::info!(
            frames = summary.frames,
            average_score = summary.average_score,
            average_blink_rate = summary.average_blink_rate,
            duration_secs,
            "Focus session ended"
        );

        self.report = Some(report.clone());
        Ok(report)
    }
}

impl Drop for FocusSession {
    fn drop(&mut self) {
        if self.camera.is_open() {
            self.camera.stop_all_tracks();
        }
    }
}
