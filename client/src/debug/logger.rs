//! File-based logging initialization

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::{LogConfig, DEFAULT_LOG_FILTER, LOG_FILE_NAME};

/// Initialize the logging system
///
/// Sets up file-based logging with:
/// - Daily log rotation under `CLIENT_LOG_DIR` (default `logs/client.log`)
/// - Non-blocking writes so request paths never wait on disk
/// - Optional stderr mirror (`CLIENT_LOG_CONSOLE=1`)
/// - Panic hook integration for crash logging
///
/// Keep the returned guard alive until exit; dropping it flushes and stops
/// the writer thread. Returns `None` if the log directory can't be created.
pub fn init() -> Option<WorkerGuard> {
    let config = LogConfig::from_env();

    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let console_layer = config
        .console
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false).boxed());

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Err(e) = initialized {
        eprintln!("Warning: Logging already initialized: {}", e);
        return None;
    }

    tracing::info!(
        log_file = %config.log_file().display(),
        log_level = %config.log_level,
        console = config.console,
        "Client logging initialized"
    );

    setup_panic_hook();
    Some(guard)
}

/// Log panics before the default hook prints them
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(location = %location, message = %message, "Application panic");
        default_panic(panic_info);
    }));
}
