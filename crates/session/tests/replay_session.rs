use std::path::PathBuf;

use medfocus_landmark_model::report::SessionReport;
use medfocus_session::backend::load_replay;
use medfocus_session::{ChannelAlertSink, FocusSession, SessionConfig, SessionState};

fn fixture_frames() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("frames.jsonl")
}

#[tokio::test]
async fn replayed_recording_scores_posture_and_absence() {
    let dir = std::env::temp_dir().join("medfocus_test_replay_session");
    let _ = std::fs::remove_dir_all(&dir);

    let (camera, detector, header) = load_replay(fixture_frames(), 30).expect("fixture loads");
    assert_eq!(header.expect("fixture has a header").frame_rate_hz, 30);

    let config = SessionConfig {
        frame_rate_hz: 0,
        results_path: Some(dir.join("results.jsonl")),
        reports_dir: Some(dir.join("reports")),
        ..SessionConfig::default()
    };
    let mut session = FocusSession::new(config, Box::new(camera), Box::new(detector));
    let (tx, mut alerts) = tokio::sync::mpsc::unbounded_channel();
    session.add_alert_sink(Box::new(ChannelAlertSink::new(tx)));

    session.start().expect("replay camera opens");
    let scored = session.run_frame_loop().await.expect("loop completes");
    assert_eq!(scored, 90);

    let report = session.end().expect("session ends");
    assert_eq!(session.state(), SessionState::Ended);

    // 30 upright frames hold 100, 6 absent frames decay 0.01, 54 slouched
    // frames cost 0.08 each
    let expected_final = 100.0 - 6.0 * 0.01 - 54.0 * 0.08;
    assert_eq!(report.summary.frames, 90);
    assert!((report.summary.final_score - expected_final).abs() < 1e-6);
    assert!(report.summary.average_score > expected_final);
    assert_eq!(report.summary.average_blink_rate, 0.0);
    assert!((report.summary.duration_secs - 2.9666).abs() < 1e-6);
    assert_eq!(report.summary.ordinary_alerts, 0);
    assert!(alerts.try_recv().is_err());

    let saved = SessionReport::load(dir.join("reports").join(&report.id)).expect("report saved");
    assert_eq!(saved.id, report.id);
    assert_eq!(saved.summary.frames, 90);
    assert!((saved.summary.average_score - report.summary.average_score).abs() < 1e-9);

    let results = std::fs::read_to_string(dir.join("results.jsonl")).unwrap();
    assert_eq!(results.lines().count(), 91);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn strict_settings_raise_alerts_once() {
    let (camera, detector, _) = load_replay(fixture_frames(), 30).unwrap();

    let mut config = SessionConfig {
        frame_rate_hz: 0,
        ..SessionConfig::default()
    };
    config.settings.posture_penalty = 2.0;
    let mut session = FocusSession::new(config, Box::new(camera), Box::new(detector));
    let (tx, mut alerts) = tokio::sync::mpsc::unbounded_channel();
    session.add_alert_sink(Box::new(ChannelAlertSink::new(tx)));

    session.start().unwrap();
    session.run_frame_loop().await.unwrap();
    let report = session.end().unwrap();

    let mut levels = Vec::new();
    while let Ok(event) = alerts.try_recv() {
        levels.push(event.level);
    }
    use medfocus_scoring::alerts::AlertLevel;
    assert_eq!(levels, vec![AlertLevel::Ordinary, AlertLevel::Critical]);
    assert_eq!(report.summary.ordinary_alerts, 1);
    assert_eq!(report.summary.critical_alerts, 1);
    assert_eq!(report.summary.final_score, 0.0);
}
