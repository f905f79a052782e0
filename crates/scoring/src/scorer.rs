//! Per-frame focus scorer.
//!
//! Each admitted frame runs through blink, gaze and posture checks. Any
//! failing check adds its penalty; the score drops by the sum or, when
//! nothing failed, recovers by a fixed increment. Frames without a pose
//! only decay the score.

use medfocus_common::clock::FrameGate;
use medfocus_common::config::FocusSettings;
use medfocus_landmark_model::frame::LandmarkFrame;
use serde::{Deserialize, Serialize};

use crate::blink::{average_ear, BlinkTracker};
use crate::gaze::{gaze_offset, is_not_looking};
use crate::history::{SessionHistory, SessionSummary};
use crate::posture::{is_slouching, read_posture};

/// Score at the start of every session.
pub const MAX_SCORE: f64 = 100.0;

/// Immutable outcome of scoring one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub timestamp_ms: f64,
    /// Score after this frame's update.
    pub score: f64,
    /// Penalty applied on this frame (the decay for no-pose frames).
    pub penalty: f64,
    pub blinking: bool,
    pub slouching: bool,
    pub not_looking: bool,
    /// Blinks inside the trailing window.
    pub blink_rate: usize,
    pub pose_present: bool,
}

/// Stateful scorer for one focus session.
#[derive(Debug, Clone)]
pub struct FocusScorer {
    settings: FocusSettings,
    score: f64,
    blink: BlinkTracker,
    gate: FrameGate,
    started_at_ms: Option<f64>,
    history: SessionHistory,
}

impl FocusScorer {
    pub fn new(settings: FocusSettings) -> Self {
        Self {
            blink: BlinkTracker::new(settings.blink_window_secs),
            settings,
            score: MAX_SCORE,
            gate: FrameGate::new(),
            started_at_ms: None,
            history: SessionHistory::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FocusSettings::default())
    }

    /// Score one frame. Returns `None` when the frame's timestamp was
    /// already processed.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Option<FrameResult> {
        let now = frame.timestamp_ms;
        if !self.gate.admit(now) {
            tracing::trace!(timestamp_ms = now, "Skipping repeated frame");
            return None;
        }
        let started = *self.started_at_ms.get_or_insert(now);

        let Some(pose) = frame.primary_pose() else {
            self.blink.prune(now);
            let decay = self.settings.no_pose_decay;
            self.score = (self.score - decay).max(0.0);
            return Some(self.finish_frame(FrameResult {
                timestamp_ms: now,
                score: self.score,
                penalty: decay,
                blinking: false,
                slouching: false,
                not_looking: false,
                blink_rate: self.blink.rate(),
                pose_present: false,
            }));
        };

        let face = frame.primary_face();
        let ear = face.and_then(average_ear);
        let blink = self
            .blink
            .update(ear, self.settings.ear_threshold, now);

        let not_looking = face
            .and_then(gaze_offset)
            .is_some_and(|offset| is_not_looking(offset, &self.settings));

        let slouching = read_posture(pose)
            .is_some_and(|reading| is_slouching(&reading, &self.settings));

        let mut penalty = 0.0;
        let past_grace = now - started > self.settings.grace_period_secs * 1000.0;
        let rate = blink.rate as f64;
        if past_grace && (rate < self.settings.min_blink_rate || rate > self.settings.max_blink_rate)
        {
            penalty += self.settings.blink_penalty;
        }
        if not_looking {
            penalty += self.settings.gaze_penalty;
        }
        if slouching {
            penalty += self.settings.posture_penalty;
        }

        self.score = apply_penalty(self.score, penalty, self.settings.recovery_increment);

        if penalty > 0.0 {
            tracing::debug!(
                timestamp_ms = now,
                score = self.score,
                penalty,
                blink_rate = blink.rate,
                not_looking,
                slouching,
                "Focus penalty applied"
            );
        }

        Some(self.finish_frame(FrameResult {
            timestamp_ms: now,
            score: self.score,
            penalty,
            blinking: blink.is_blinking,
            slouching,
            not_looking,
            blink_rate: blink.rate,
            pose_present: true,
        }))
    }

    fn finish_frame(&mut self, result: FrameResult) -> FrameResult {
        self.history.record(result.score, result.blink_rate);
        result
    }

    /// Current score in `[0, 100]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn blink_rate(&self) -> usize {
        self.blink.rate()
    }

    pub fn settings(&self) -> &FocusSettings {
        &self.settings
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Timestamp of the first admitted frame.
    pub fn started_at_ms(&self) -> Option<f64> {
        self.started_at_ms
    }

    /// Replace the settings. The score and history are kept.
    pub fn set_settings(&mut self, settings: FocusSettings) {
        self.blink.set_window_secs(settings.blink_window_secs);
        self.settings = settings;
    }

    /// Summarize the session so far.
    pub fn summary(&self) -> SessionSummary {
        self.history.summarize(self.score)
    }

    /// Return to the state of a fresh session with the same settings.
    pub fn reset(&mut self) {
        self.score = MAX_SCORE;
        self.blink.reset();
        self.gate.reset();
        self.started_at_ms = None;
        self.history.clear();
    }
}

impl Default for FocusScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One score update: drop by `penalty` when positive, otherwise recover by
/// `increment`. The result stays within `[0, 100]`.
pub fn apply_penalty(score: f64, penalty: f64, increment: f64) -> f64 {
    if penalty > 0.0 {
        (score - penalty).max(0.0)
    } else {
        (score + increment).min(MAX_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medfocus_landmark_model::indices::{face, pose};
    use medfocus_landmark_model::landmark::Landmark;

    /// Face with open eyes looking straight ahead (EAR 0.6, gaze offset 4).
    fn attentive_face() -> Vec<Landmark> {
        face_mesh(0.06, 0.47)
    }

    /// Face with eyes nearly shut (EAR 0.1).
    fn closed_eyes_face() -> Vec<Landmark> {
        face_mesh(0.01, 0.47)
    }

    /// Open-eyed face pitched down (gaze offset 10).
    fn looking_down_face() -> Vec<Landmark> {
        face_mesh(0.06, 0.50)
    }

    fn face_mesh(eye_open: f64, nose_y: f64) -> Vec<Landmark> {
        let mut mesh = vec![Landmark::new(0.5, 0.5); face::MESH_LEN];
        place_eye(&mut mesh, &face::LEFT_EYE, 0.35, eye_open);
        place_eye(&mut mesh, &face::RIGHT_EYE, 0.55, eye_open);
        mesh[face::FOREHEAD] = Landmark::new(0.5, 0.30);
        mesh[face::NOSE_TIP] = Landmark::new(0.5, nose_y);
        mesh[face::CHIN] = Landmark::new(0.5, 0.60);
        mesh
    }

    /// Feed `blinks` closed/open pairs 100 ms apart starting at `start`.
    /// Returns the timestamp after the last frame.
    fn blink_run(scorer: &mut FocusScorer, start: f64, blinks: usize) -> f64 {
        let mut t = start;
        for _ in 0..blinks {
            scorer.process(&frame(t, Some(closed_eyes_face()), Some(upright_pose())));
            scorer.process(&frame(t + 100.0, Some(attentive_face()), Some(upright_pose())));
            t += 200.0;
        }
        t
    }

    fn place_eye(mesh: &mut [Landmark], idx: &[usize; 6], left_x: f64, open: f64) {
        let y = 0.4;
        let points = [
            Landmark::new(left_x, y),
            Landmark::new(left_x + 0.025, y - open / 2.0),
            Landmark::new(left_x + 0.075, y - open / 2.0),
            Landmark::new(left_x + 0.1, y),
            Landmark::new(left_x + 0.075, y + open / 2.0),
            Landmark::new(left_x + 0.025, y + open / 2.0),
        ];
        for (&i, p) in idx.iter().zip(points) {
            mesh[i] = p;
        }
    }

    fn upright_pose() -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); pose::POSE_LEN];
        landmarks[pose::NOSE] = Landmark::new(0.5, 0.4);
        landmarks[pose::LEFT_SHOULDER] = Landmark::new(0.65, 0.7);
        landmarks[pose::RIGHT_SHOULDER] = Landmark::new(0.35, 0.7);
        landmarks
    }

    fn slouched_pose() -> Vec<Landmark> {
        let mut landmarks = upright_pose();
        landmarks[pose::NOSE] = Landmark::new(0.6, 0.62);
        landmarks
    }

    fn frame(t: f64, face: Option<Vec<Landmark>>, pose: Option<Vec<Landmark>>) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty(t);
        if let Some(face) = face {
            frame = frame.with_face(face);
        }
        if let Some(pose) = pose {
            frame = frame.with_pose(pose);
        }
        frame
    }

    #[test]
    fn test_attentive_frames_keep_full_score() {
        let mut scorer = FocusScorer::with_defaults();
        for i in 0..30 {
            let result = scorer
                .process(&frame(i as f64 * 33.0, Some(attentive_face()), Some(upright_pose())))
                .unwrap();
            assert_eq!(result.penalty, 0.0);
            assert!(!result.slouching && !result.not_looking && !result.blinking);
        }
        assert_eq!(scorer.score(), 100.0);
        assert_eq!(scorer.history().len(), 30);
    }

    #[test]
    fn test_slouching_applies_posture_penalty() {
        let mut scorer = FocusScorer::with_defaults();
        let result = scorer
            .process(&frame(0.0, Some(attentive_face()), Some(slouched_pose())))
            .unwrap();
        assert!(result.slouching);
        assert!((result.penalty - 0.08).abs() < 1e-12);
        assert!((result.score - 99.92).abs() < 1e-9);
    }

    #[test]
    fn test_no_pose_decays_only() {
        let mut scorer = FocusScorer::with_defaults();
        let result = scorer
            .process(&frame(0.0, Some(attentive_face()), None))
            .unwrap();
        assert!(!result.pose_present);
        assert!(!result.blinking && !result.not_looking && !result.slouching);
        assert!((result.score - 99.99).abs() < 1e-9);
        assert_eq!(scorer.history().len(), 1);
    }

    #[test]
    fn test_repeated_timestamp_is_skipped() {
        let mut scorer = FocusScorer::with_defaults();
        let f = frame(10.0, None, Some(slouched_pose()));
        assert!(scorer.process(&f).is_some());
        assert!(scorer.process(&f).is_none());
        assert_eq!(scorer.history().len(), 1);
    }

    #[test]
    fn test_blink_rate_ignored_during_grace_period() {
        let mut scorer = FocusScorer::with_defaults();
        // zero blinks is below the minimum, but only penalized after 60 s
        let early = scorer
            .process(&frame(0.0, Some(attentive_face()), Some(upright_pose())))
            .unwrap();
        assert_eq!(early.penalty, 0.0);

        let late = scorer
            .process(&frame(61_000.0, Some(attentive_face()), Some(upright_pose())))
            .unwrap();
        assert!((late.penalty - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_gaze_outside_band_applies_gaze_penalty() {
        let mut scorer = FocusScorer::with_defaults();
        let result = scorer
            .process(&frame(0.0, Some(looking_down_face()), Some(upright_pose())))
            .unwrap();
        assert!(result.not_looking);
        assert!(!result.slouching && !result.blinking);
        assert!((result.penalty - 0.10).abs() < 1e-12);
        assert!((result.score - 99.90).abs() < 1e-9);
    }

    #[test]
    fn test_blink_detected_from_face_mesh() {
        let mut scorer = FocusScorer::with_defaults();
        let closed = scorer
            .process(&frame(0.0, Some(closed_eyes_face()), Some(upright_pose())))
            .unwrap();
        assert!(closed.blinking);
        assert_eq!(closed.blink_rate, 0);

        let reopened = scorer
            .process(&frame(33.0, Some(attentive_face()), Some(upright_pose())))
            .unwrap();
        assert!(!reopened.blinking);
        assert_eq!(reopened.blink_rate, 1);
        // blinking is not penalized during the grace period
        assert_eq!(reopened.penalty, 0.0);
    }

    #[test]
    fn test_blink_rate_above_maximum_is_penalized() {
        let mut scorer = FocusScorer::with_defaults();
        blink_run(&mut scorer, 1_000.0, 31);

        // first frame at 1 000 ms, so the grace period ends after 61 000 ms
        let result = scorer
            .process(&frame(61_050.0, Some(attentive_face()), Some(upright_pose())))
            .unwrap();
        assert_eq!(result.blink_rate, 31);
        assert!((result.penalty - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_blink_rate_at_maximum_is_not_penalized() {
        let mut scorer = FocusScorer::with_defaults();
        blink_run(&mut scorer, 1_000.0, 30);

        let result = scorer
            .process(&frame(61_050.0, Some(attentive_face()), Some(upright_pose())))
            .unwrap();
        assert_eq!(result.blink_rate, 30);
        assert_eq!(result.penalty, 0.0);
    }

    #[test]
    fn test_all_penalties_add_up() {
        let mut scorer = FocusScorer::with_defaults();
        scorer.process(&frame(0.0, Some(attentive_face()), Some(upright_pose())));

        // no blinks after the grace period, looking down, and slouched
        let result = scorer
            .process(&frame(61_000.0, Some(looking_down_face()), Some(slouched_pose())))
            .unwrap();
        assert!(result.not_looking && result.slouching);
        assert_eq!(result.blink_rate, 0);
        assert!((result.penalty - (0.05 + 0.10 + 0.08)).abs() < 1e-12);
        assert!((result.score - 99.77).abs() < 1e-9);
    }

    #[test]
    fn test_cloned_scorer_carries_state() {
        let mut scorer = FocusScorer::with_defaults();
        scorer.process(&frame(0.0, Some(attentive_face()), Some(slouched_pose())));

        let mut copy = scorer.clone();
        assert_eq!(copy.score(), scorer.score());
        assert!(copy.process(&frame(0.0, None, None)).is_none());
        assert!(copy.process(&frame(33.0, None, None)).is_some());
        assert_eq!(copy.history().len(), 2);
        assert_eq!(scorer.history().len(), 1);
    }

    #[test]
    fn test_pose_without_face_is_neutral_for_eyes_and_gaze() {
        let mut scorer = FocusScorer::with_defaults();
        let result = scorer.process(&frame(0.0, None, Some(upright_pose()))).unwrap();
        assert!(!result.blinking && !result.not_looking);
        assert_eq!(result.penalty, 0.0);
    }

    #[test]
    fn test_reset_restores_fresh_session() {
        let mut scorer = FocusScorer::with_defaults();
        for i in 0..10 {
            scorer.process(&frame(i as f64, None, Some(slouched_pose())));
        }
        assert!(scorer.score() < 100.0);

        scorer.reset();
        assert_eq!(scorer.score(), 100.0);
        assert_eq!(scorer.blink_rate(), 0);
        assert!(scorer.history().is_empty());
        assert!(scorer.started_at_ms().is_none());
        // timestamps may restart from zero
        assert!(scorer.process(&frame(0.0, None, None)).is_some());
    }

    #[test]
    fn test_apply_penalty_bounds() {
        assert_eq!(apply_penalty(0.05, 0.1, 0.05), 0.0);
        assert_eq!(apply_penalty(99.99, 0.0, 0.05), 100.0);
        assert!((apply_penalty(50.0, 0.0, 0.05) - 50.05).abs() < 1e-12);
    }

    #[test]
    fn test_summary_uses_history() {
        let mut scorer = FocusScorer::with_defaults();
        assert_eq!(scorer.summary().average_score, 0.0);
        scorer.process(&frame(0.0, None, None));
        let summary = scorer.summary();
        assert_eq!(summary.frames, 1);
        assert!((summary.final_score - 99.99).abs() < 1e-9);
    }
}
