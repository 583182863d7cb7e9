//! Tracing/logging initialization.
//!
//! Filtering comes from `RUST_LOG` (default `info`); the output shape from
//! `STOCKWIDGET_LOG_FORMAT` (`json`, the default, or `pretty`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "STOCKWIDGET_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format {0:?} (expected `json` or `pretty`)")]
pub struct ParseLogFormatError(pub String);

impl FromStr for LogFormat {
    type Err = ParseLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ParseLogFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        })
    }
}

impl LogFormat {
    /// Read the format from an arbitrary key lookup; unknown values fall back
    /// to JSON.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(LOG_FORMAT_ENV)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Initialize tracing/logging for the process using the format named by the
/// environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(LogFormat::from_env());
}

/// Initialize tracing/logging with an explicit output format.
pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout belongs to the widget output.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(
            "xml".parse::<LogFormat>().unwrap_err(),
            ParseLogFormatError("xml".to_string())
        );
    }

    #[test]
    fn lookup_defaults_to_json() {
        assert_eq!(LogFormat::from_lookup(|_| None), LogFormat::Json);
        assert_eq!(LogFormat::from_lookup(|_| Some("nope".into())), LogFormat::Json);
        assert_eq!(
            LogFormat::from_lookup(|k| (k == LOG_FORMAT_ENV).then(|| "pretty".into())),
            LogFormat::Pretty
        );
    }

    #[test]
    fn init_is_idempotent() {
        init_with(LogFormat::Pretty);
        init_with(LogFormat::Json);
        init();
    }
}
