//! Logging setup, configured once at process start from `LogSettings`.
//!
//! Log lines go to stdout and, unless disabled, are appended to a log file.
//! `RUST_LOG` overrides the default level.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use console::Term;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Where and how to log.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Append-mode log file; `None` logs to stdout only.
    pub log_file: Option<PathBuf>,
    /// Disable ANSI colors on stdout.
    pub no_color: bool,
    /// Level used when `RUST_LOG` is unset.
    pub default_level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from(crate::domain::schedule::DEFAULT_LOG_PATH)),
            no_color: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogSettings {
    /// Colors only on an interactive stdout. `NO_COLOR` arrives through `no_color`.
    #[must_use]
    pub fn use_colors(&self) -> bool {
        !self.no_color && Term::stdout().is_term()
    }
}

/// Install the global subscriber.
///
/// An unopenable log file is reported on stderr and skipped; logging to
/// stdout still works.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_level));

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(settings.use_colors())
        .with_writer(std::io::stdout);

    let file_layer = settings.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!("warning: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("installing log subscriber")
}
