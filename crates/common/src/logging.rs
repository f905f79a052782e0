//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. When a log file
//! is configured, output goes there instead of stderr.

use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber described by `config`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_file = config.file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("medfocus: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match (log_file, config.json) {
        (Some(file), true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(Mutex::new(file)).finish(),
        ),
        (Some(file), false) => tracing::subscriber::set_global_default(
            builder.with_ansi(false).with_writer(Mutex::new(file)).finish(),
        ),
        (None, true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(std::io::stderr).finish(),
        ),
        (None, false) => {
            tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())
        }
    };
    installed.ok();
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
