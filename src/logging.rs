//! Sets up tracing for the command line app.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::Error;

/// The file debug logs are appended to.
pub const LOG_FILE_NAME: &str = "debug.log";

/// Send warnings (or the level set in `RUST_LOG`) to stderr and everything
/// down to debug level to `log_path`.
///
/// # Errors
/// Returns an [Error::IoError] if the log file cannot be opened.
pub fn setup_logging(log_path: &Path) -> Result<(), Error> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        );

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
