//! Error types for oraq.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors fall into five categories:
//! - **Argument**: wrong number of positional arguments for a command
//! - **Decode**: a positional argument is not a valid validator address
//! - **Service**: the remote query failed (not found, unreachable, rejected)
//! - **Configuration**: config file parsing or invalid values
//! - **Internal**: I/O, serialization
//!
//! Each error has a stable error code (e.g., `ORAQ-D001`) for programmatic handling.
//!
//! ## Fix Suggestions
//!
//! Each error can provide actionable fix suggestions via
//! [`OraqError::fix_suggestions()`].

pub mod suggestions;

use thiserror::Error;
use tonic::Code;

use crate::core::address::AddressError;
use crate::core::router::{Arity, ServiceError};

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Wrong argument count for a command.
    Argument,
    /// Positional argument failed to decode.
    Decode,
    /// Remote query failed.
    Service,
    /// Configuration issues (parse errors, invalid values, missing files).
    Configuration,
    /// Internal errors (I/O, serialization).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Argument => "Argument error",
            Self::Decode => "Decode error",
            Self::Service => "Service error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Argument => "A",
            Self::Decode => "D",
            Self::Service => "S",
            Self::Configuration => "C",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Bad arguments or configuration
    UsageError = 2,
    /// Validator address failed to decode
    DecodeError = 3,
    /// The query service returned an error or could not be reached
    ServiceError = 4,
    /// The query did not complete in time
    Timeout = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for oraq operations.
#[derive(Error, Debug)]
pub enum OraqError {
    // ==========================================================================
    // Argument errors
    // ==========================================================================
    /// A command received the wrong number of positional arguments.
    #[error("{command}: accepts {expected} arg(s), received {received}")]
    WrongArgCount {
        command: String,
        expected: Arity,
        received: usize,
    },

    // ==========================================================================
    // Decode errors
    // ==========================================================================
    /// A validator argument is not a valid operator address.
    #[error("invalid validator address '{input}': {source}")]
    InvalidAddress {
        input: String,
        #[source]
        source: AddressError,
    },

    // ==========================================================================
    // Service errors
    // ==========================================================================
    /// The remote query failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Configuration file not found at an explicitly requested path.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse {
        path: String,
        line: Option<usize>,
        message: String,
    },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OraqError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::WrongArgCount { .. }
            | Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. } => ExitCode::UsageError,

            Self::InvalidAddress { .. } => ExitCode::DecodeError,

            Self::Service(err) => match err.code {
                Code::DeadlineExceeded => ExitCode::Timeout,
                _ => ExitCode::ServiceError,
            },

            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::WrongArgCount { .. } => ErrorCategory::Argument,
            Self::InvalidAddress { .. } => ErrorCategory::Decode,
            Self::Service(_) => ErrorCategory::Service,
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `ORAQ-{category}{number}` where category is:
    /// - A: Argument
    /// - D: Decode
    /// - S: Service
    /// - C: Configuration
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::WrongArgCount { .. } => "ORAQ-A001",
            Self::InvalidAddress { .. } => "ORAQ-D001",
            Self::Service(err) => match err.code {
                Code::NotFound => "ORAQ-S001",
                Code::Unavailable => "ORAQ-S002",
                Code::DeadlineExceeded => "ORAQ-S003",
                Code::InvalidArgument => "ORAQ-S004",
                Code::Unimplemented => "ORAQ-S005",
                _ => "ORAQ-S099",
            },
            Self::ConfigNotFound { .. } => "ORAQ-C001",
            Self::ConfigParse { .. } => "ORAQ-C002",
            Self::ConfigInvalid { .. } => "ORAQ-C003",
            Self::Io(_) => "ORAQ-X001",
            Self::Json(_) => "ORAQ-X002",
            Self::Yaml(_) => "ORAQ-X003",
        }
    }

    /// Returns whether running the same command again might succeed.
    ///
    /// Advisory only; oraq never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Service(err) => matches!(
                err.code,
                Code::Unavailable | Code::DeadlineExceeded | Code::ResourceExhausted
            ),
            _ => false,
        }
    }

    /// Returns actionable fix suggestions for this error.
    ///
    /// # Example
    ///
    /// ```
    /// use oraq::core::router::Arity;
    /// use oraq::error::OraqError;
    ///
    /// let err = OraqError::WrongArgCount {
    ///     command: "feeder".to_string(),
    ///     expected: Arity::Exactly1,
    ///     received: 0,
    /// };
    /// let suggestions = err.fix_suggestions();
    /// assert!(suggestions[0].commands.iter().any(|c| c.contains("feeder")));
    /// ```
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::WrongArgCount {
                command, expected, ..
            } => suggestions::wrong_arg_count_suggestions(command, *expected),
            Self::InvalidAddress { input, source } => {
                suggestions::invalid_address_suggestions(input, source)
            }
            Self::Service(err) => suggestions::service_suggestions(err),
            Self::ConfigNotFound { path } => suggestions::config_not_found_suggestions(path),
            Self::ConfigParse {
                path,
                line,
                message,
            } => suggestions::config_parse_suggestions(path, *line, message),
            Self::ConfigInvalid {
                key,
                value,
                message,
            } => suggestions::config_invalid_suggestions(key, value, message),
            Self::Io(err) => vec![FixSuggestion::new(
                vec!["oraq config".to_string()],
                format!("I/O error: {err}. Check file permissions and paths."),
            )],
            Self::Json(err) => vec![FixSuggestion::new(
                vec!["oraq --format human <command>".to_string()],
                format!("JSON serialization failed: {err}."),
            )],
            Self::Yaml(err) => vec![FixSuggestion::new(
                vec!["oraq --format json <command>".to_string()],
                format!("YAML serialization failed: {err}."),
            )],
        }
    }
}

/// Result type alias for oraq operations.
pub type Result<T> = std::result::Result<T, OraqError>;

// =============================================================================
// Tests
// =============================================================================
