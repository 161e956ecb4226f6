//! Structured logging setup.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// JSON lines, for ingestion.
    Json,
}

impl LogFormat {
    /// Parses a format string, defaulting to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Options for environment-based initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Whether verbose output was requested via CLI.
    pub verbose: bool,
    /// Output format.
    pub format: LogFormat,
}

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Initializes the global tracing subscriber.
///
/// The filter comes from `LLMBENCH_LOG` when set, otherwise `info` (or
/// `debug` with `verbose`). Logs go to stderr so stdout stays clean for
/// command output. Safe to call more than once; only the first call
/// installs a subscriber.
pub fn init_logging(options: InitOptions) {
    LOGGING_INIT.get_or_init(|| {
        let default_level = if options.verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_env("LLMBENCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        let result = match options.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.try_init(),
        };
        if let Err(e) = result {
            tracing::debug!("logging already initialized: {e}");
        }
    });
}
