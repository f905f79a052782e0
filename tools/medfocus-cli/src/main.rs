//! MedFocus CLI: focus session replay, settings, and report tooling.
//!
//! Usage:
//!   medfocus replay <FRAMES>          Score a recorded landmark stream
//!   medfocus settings show|set|reset  Inspect or edit focus settings
//!   medfocus info <REPORT_DIR>        Show a saved session report
//!   medfocus check-report [OPTIONS]   Validate medical report input

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medfocus_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "medfocus",
    about = "Focus tracking and medical report simplification",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a focus session over a recorded landmark stream
    Replay {
        /// Landmark JSONL file
        frames: PathBuf,

        /// Write per-frame results to this JSONL file
        #[arg(long)]
        results: Option<PathBuf>,

        /// Save the session report under this directory
        #[arg(long)]
        report: Option<PathBuf>,

        /// Playback rate in frames per second (0 = as fast as possible)
        #[arg(long, default_value = "0")]
        fps: u32,
    },

    /// Inspect or edit focus settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show a saved session report
    Info {
        /// Path to the report directory
        path: PathBuf,
    },

    /// Validate medical report input without calling any service
    CheckReport {
        /// Plain-text report file
        #[arg(long)]
        text: Option<PathBuf>,

        /// PDF report file
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Summary language: en|es|tr
        #[arg(long, default_value = "en")]
        language: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,
    /// Change one setting
    Set {
        /// Setting name
        key: String,
        /// New value ("none" disables optional settings)
        value: String,
    },
    /// Restore default settings
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    medfocus_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            frames,
            results,
            report,
            fps,
        } => commands::replay::run(&config, frames, results, report, fps).await,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&config),
            SettingsAction::Set { key, value } => commands::settings::set(config, &key, &value),
            SettingsAction::Reset => commands::settings::reset(config),
        },
        Commands::Info { path } => commands::info::run(path),
        Commands::CheckReport {
            text,
            pdf,
            language,
        } => commands::check_report::run(text, pdf, &language),
    }
}
