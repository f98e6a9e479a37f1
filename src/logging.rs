//! Logging setup for the `depscope` binary.
//!
//! The library only emits `tracing` events; this module installs the
//! subscriber that prints them. Output goes to stderr so the scan summary on
//! stdout stays machine-readable, and `RUST_LOG` overrides the configured
//! level when set.

use std::env;
use std::io;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Configuration for logging initialization.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Emit one JSON object per event instead of human-readable lines
    pub use_json: bool,
    /// Include the module target (e.g. `depscope::graph::builder`)
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Verbose preset used by `--verbose`: debug level with targets, which
    /// prints every import found, resolved and added during a scan.
    pub fn verbose() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
        }
    }
}

/// Parses a log level name, case-insensitively.
///
/// ```
/// use depscope::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Some(Level::DEBUG));
/// assert_eq!(parse_level("loud"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(config.level.to_string())
        };

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.use_json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(config.include_target),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(config.include_target),
                )
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Warning: logging already initialized: {}", e);
        }
    });
}
