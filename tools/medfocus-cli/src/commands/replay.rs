//! Replay a recorded landmark stream through a focus session.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use medfocus_common::config::AppConfig;
use medfocus_scoring::alerts::AlertLevel;
use medfocus_session::backend::load_replay;
use medfocus_session::{ChannelAlertSink, FocusSession, SessionConfig, TracingAlertSink};

pub async fn run(
    config: &AppConfig,
    frames: PathBuf,
    results: Option<PathBuf>,
    report: Option<PathBuf>,
    fps: u32,
) -> anyhow::Result<()> {
    let (camera, detector, header) = load_replay(&frames, config.frame_rate_hz)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", frames.display()))?;

    println!("Replaying: {}", frames.display());
    if let Some(h) = &header {
        println!("  Source: {} @ {}fps", h.source, h.frame_rate_hz);
        println!("  Recorded: {}", h.epoch_wall);
    }
    println!();

    let session_config = SessionConfig {
        settings: config.focus.clone(),
        frame_rate_hz: fps,
        results_path: results.clone(),
        reports_dir: report,
    };
    let mut session = FocusSession::new(session_config, Box::new(camera), Box::new(detector));

    let (tx, mut alerts) = tokio::sync::mpsc::unbounded_channel();
    session.add_alert_sink(Box::new(ChannelAlertSink::new(tx)));
    session.add_alert_sink(Box::new(TracingAlertSink));

    let printer = tokio::spawn(async move {
        while let Some(alert) = alerts.recv().await {
            let tag = match alert.level {
                AlertLevel::Ordinary => "ALERT",
                AlertLevel::Critical => "CRITICAL",
            };
            println!(
                "[{tag}] t={:.1}s score={:.2}: {}",
                alert.timestamp_ms / 1000.0,
                alert.score,
                alert.level.message()
            );
        }
    });

    let stop = session.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, Ordering::SeqCst);
        }
    });

    session.start()?;
    session.run_frame_loop().await?;
    let report = session.end()?;
    // closes the alert channel
    drop(session);
    printer.await.ok();

    let s = &report.summary;
    println!();
    println!("Session summary:");
    println!("  Frames: {}", s.frames);
    println!("  Duration: {:.1}s", s.duration_secs);
    println!("  Average score: {:.2}", s.average_score);
    println!("  Final score: {:.2}", s.final_score);
    println!("  Average blink rate: {:.1}", s.average_blink_rate);
    println!(
        "  Alerts: {} ordinary, {} critical",
        s.ordinary_alerts, s.critical_alerts
    );
    if let Some(path) = results {
        println!("  Results: {}", path.display());
    }

    Ok(())
}
