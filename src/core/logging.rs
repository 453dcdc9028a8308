//! Diagnostic logging to stderr or a log file.
//!
//! stdout is reserved for the query result, so the subscriber never writes
//! there.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_LEVEL_ENV: &str = "ORAQ_LOG";
pub const LOG_FORMAT_ENV: &str = "ORAQ_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "ORAQ_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logs.
    #[default]
    Human,
    /// JSON logs (one event per line).
    Json,
    /// Compact logs (single line, terse).
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log level from CLI argument or `ORAQ_LOG`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    /// Parse from CLI argument.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" => Some(Self::Error),
            _ => None,
        }
    }

    /// Directive used in the `EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse log level from `ORAQ_LOG`.
#[must_use]
pub fn parse_log_level_from_env() -> Option<LogLevel> {
    non_empty_env(LOG_LEVEL_ENV).and_then(|value| LogLevel::from_arg(&value))
}

/// Parse log format from `ORAQ_LOG_FORMAT`.
#[must_use]
pub fn parse_log_format_from_env() -> Option<LogFormat> {
    non_empty_env(LOG_FORMAT_ENV).and_then(|value| LogFormat::from_arg(&value))
}

/// Parse log file path from `ORAQ_LOG_FILE`.
#[must_use]
pub fn parse_log_file_from_env() -> Option<PathBuf> {
    non_empty_env(LOG_FILE_ENV).map(PathBuf::from)
}

/// Effective logging settings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Combine CLI flags with the `ORAQ_LOG*` environment.
    ///
    /// `--log-level` beats `ORAQ_LOG`; `--json-output` beats
    /// `ORAQ_LOG_FORMAT`. `--verbose` only raises the default level.
    #[must_use]
    pub fn resolve(cli_level: Option<&str>, json_output: bool, verbose: bool) -> Self {
        let explicit = cli_level
            .and_then(LogLevel::from_arg)
            .or_else(parse_log_level_from_env);
        let level = match explicit {
            Some(level) => level,
            None if verbose => LogLevel::Debug,
            None => LogLevel::default(),
        };

        let format = if json_output {
            LogFormat::Json
        } else {
            parse_log_format_from_env().unwrap_or_default()
        };

        Self {
            level,
            format,
            file: parse_log_file_from_env(),
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_filter(&self) -> String {
        format!("oraq={}", self.level.as_filter())
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the computed filter. A log file that cannot be
/// opened falls back to stderr.
pub fn init(settings: &LogSettings) {
    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    let writer = match file {
        Some(file) => BoxMakeWriter::new(file),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    match settings.format {
        LogFormat::Json => {
            builder.json().try_init().ok();
        }
        LogFormat::Compact => {
            builder.compact().with_target(true).try_init().ok();
        }
        LogFormat::Human => {
            builder.with_target(false).without_time().try_init().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::ENV_LOCK;

    #[allow(unsafe_code)]
    fn with_env_var(key: &str, value: Option<&str>, f: impl FnOnce()) {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let prior = std::env::var(key).ok();
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
        f();
        unsafe {
            match prior {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    fn level_parsing_accepts_aliases() {
        assert_eq!(LogLevel::from_arg("VERBOSE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_arg("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_arg("critical"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_arg("loud"), None);
    }

    #[test]
    fn env_level_is_read() {
        with_env_var(LOG_LEVEL_ENV, Some("trace"), || {
            assert_eq!(parse_log_level_from_env(), Some(LogLevel::Trace));
        });
        with_env_var(LOG_LEVEL_ENV, Some("  "), || {
            assert_eq!(parse_log_level_from_env(), None);
        });
    }

    #[test]
    fn cli_level_beats_env() {
        with_env_var(LOG_LEVEL_ENV, Some("trace"), || {
            let settings = LogSettings::resolve(Some("warn"), false, false);
            assert_eq!(settings.level, LogLevel::Warn);
        });
    }

    #[test]
    fn verbose_only_raises_default() {
        with_env_var(LOG_LEVEL_ENV, None, || {
            assert_eq!(LogSettings::resolve(None, false, true).level, LogLevel::Debug);
            assert_eq!(
                LogSettings::resolve(Some("info"), false, true).level,
                LogLevel::Info
            );
            assert_eq!(LogSettings::resolve(None, false, false).level, LogLevel::Error);
        });
    }

    #[test]
    fn json_output_flag_wins() {
        with_env_var(LOG_FORMAT_ENV, Some("compact"), || {
            assert_eq!(LogSettings::resolve(None, true, false).format, LogFormat::Json);
            assert_eq!(
                LogSettings::resolve(None, false, false).format,
                LogFormat::Compact
            );
        });
    }

    #[test]
    fn default_filter_targets_crate() {
        let settings = LogSettings {
            level: LogLevel::Debug,
            ..LogSettings::default()
        };
        assert_eq!(settings.default_filter(), "oraq=debug");
    }
}
