//! Show a saved session report.

use std::path::PathBuf;

use medfocus_landmark_model::report::SessionReport;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let report =
        SessionReport::load(&path).map_err(|e| anyhow::anyhow!("Failed to load report: {e}"))?;

    println!("Report: {}", report.id);
    println!("  Started: {}", report.started_at);
    println!("  Ended: {}", report.ended_at);
    println!();

    let s = &report.summary;
    println!("Summary:");
    println!("  Frames: {}", s.frames);
    println!("  Duration: {:.1}s", s.duration_secs);
    println!("  Average score: {:.2}", s.average_score);
    println!("  Final score: {:.2}", s.final_score);
    println!("  Average blink rate: {:.1}", s.average_blink_rate);
    println!(
        "  Alerts: {} ordinary, {} critical",
        s.ordinary_alerts, s.critical_alerts
    );
    println!();

    let f = &report.settings;
    println!("Settings:");
    println!(
        "  Alert thresholds: {} / {} (critical)",
        f.alert_threshold, f.critical_threshold
    );
    println!(
        "  Blink rate band: {}..{} per {}s",
        f.min_blink_rate, f.max_blink_rate, f.blink_window_secs
    );
    println!(
        "  Penalties: blink {} / gaze {} / posture {}",
        f.blink_penalty, f.gaze_penalty, f.posture_penalty
    );

    Ok(())
}
