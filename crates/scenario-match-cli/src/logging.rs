//! Structured logging with environment variable configuration.
//!
//! Logs are written to stderr so comparison reports on stdout stay
//! machine-readable. Records emitted through the `log` facade by the
//! library crates are forwarded to the same subscriber.

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_LEVEL_VAR: &str = "SCENARIO_MATCH_LOG_LEVEL";

/// Verbosity of diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum LogLevel {
    /// Per-leaf matching decisions.
    Trace,
    /// Captures and template mode decisions.
    Debug,
    /// Committed symbols.
    Info,
    /// Problems that did not stop the command.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    pub(crate) fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Pick the effective level.
///
/// Precedence, highest first: the `--log-level` flag, then
/// `SCENARIO_MATCH_LOG_LEVEL`, then `warn`. An unparsable variable is
/// ignored.
pub(crate) fn effective_level(
    flag: Option<LogLevel>,
    lookup: impl Fn(&str) -> Option<String>,
) -> LogLevel {
    flag.or_else(|| lookup(LOG_LEVEL_VAR).and_then(|value| value.parse().ok()))
        .unwrap_or_default()
}

/// Initialise logging for the command line level `flag`.
///
/// If a global subscriber is already set the call has no effect.
pub(crate) fn init_logging(flag: Option<LogLevel>) {
    let level = effective_level(flag, |name| env::var(name).ok());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.as_filter_str()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    // The first subscriber wins; later calls are ignored.
    let _ = subscriber.try_init();
}
