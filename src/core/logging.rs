//! Logging Module
//!
//! Sets up `tracing` for the importer:
//! - stdout layer (pretty, compact or JSON)
//! - optional daily-rolling JSON file layer
//! - `log` crate events redirected into `tracing`

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

/// File name prefix for rolling log files.
pub const LOG_FILE_NAME: &str = "npc-bridge.log";

/// Filter from `RUST_LOG`, else the configured directive, else `info`.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` when a file layer is active; it must be kept alive
/// for buffered log lines to be flushed on shutdown. Calling this twice is
/// harmless: the second registry is discarded.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = env_filter(config);

    let stdout_layer = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty()
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .compact()
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json()
            .boxed(),
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .boxed();
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create log directory {}: {e}", dir.display());
                (None, None)
            }
        },
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer);
    let initialized = tracing::subscriber::set_global_default(subscriber);

    if initialized.is_ok() {
        if let Err(e) = tracing_log::LogTracer::init() {
            eprintln!("Failed to initialize LogTracer: {e}");
        }
        tracing::debug!(
            file = ?config.log_dir.as_ref().map(|d| d.join(LOG_FILE_NAME)),
            "Logging initialized"
        );
    }

    guard
}
