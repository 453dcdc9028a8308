//! Fix suggestions for oraq errors.
//!
//! Maps each error kind to commands the user can run next, with a short
//! explanation and, where useful, how to avoid the error in the future.

use serde::Serialize;
use tonic::Code;

use crate::core::address::{AddressError, DEFAULT_VALOPER_PREFIX};
use crate::core::router::{Arity, QueryKind, ServiceError};

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone, Serialize)]
pub struct FixSuggestion {
    /// Commands to try, copy-paste ready.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevention: Option<String>,

    /// Link to documentation for more information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,

    /// Whether this can potentially be auto-fixed.
    pub auto_fixable: bool,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
            doc_url: None,
            auto_fixable: false,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }

    /// Builder: adds documentation URL.
    #[must_use]
    pub fn with_doc_url(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }

    /// Builder: marks as auto-fixable.
    #[must_use]
    pub const fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }
}

const GRPC_STATUS_DOC: &str = "https://grpc.io/docs/guides/status-codes/";

// =============================================================================
// Argument errors
// =============================================================================

/// Suggestions for a command called with the wrong number of arguments.
#[must_use]
pub fn wrong_arg_count_suggestions(command: &str, expected: Arity) -> Vec<FixSuggestion> {
    let usage = QueryKind::from_command(command).map_or_else(
        || format!("oraq {command}"),
        |kind| format!("oraq {}", kind.usage()),
    );

    let context = match expected {
        Arity::None => format!("`{command}` takes no arguments."),
        Arity::Optional => format!(
            "`{command}` takes at most one argument. Omit it to list every entry."
        ),
        Arity::Exactly1 => format!("`{command}` needs exactly one argument."),
    };

    vec![FixSuggestion::new(vec![usage, format!("oraq {command} --help")], context)]
}

// =============================================================================
// Decode errors
// =============================================================================

/// Suggestions for a validator argument that did not decode.
#[must_use]
pub fn invalid_address_suggestions(input: &str, source: &AddressError) -> Vec<FixSuggestion> {
    let context = match source {
        AddressError::WrongPrefix { expected, actual } => format!(
            "'{input}' is a {actual} address. Validator commands take the operator \
             address, which starts with {expected}1."
        ),
        AddressError::Empty => "The validator address is empty.".to_string(),
        _ => format!(
            "'{input}' is not a bech32 validator operator address. Check for typos \
             or a truncated copy."
        ),
    };

    vec![
        FixSuggestion::new(
            vec![
                "oraq aggregate-votes --format json".to_string(),
                "oraq aggregate-prevotes --format json".to_string(),
            ],
            context,
        )
        .with_prevention(format!(
            "Copy the `voter` field from the aggregate listings. On chains other \
             than Kujira, set `chain.valoper_prefix` (default {DEFAULT_VALOPER_PREFIX})."
        )),
    ]
}

// =============================================================================
// Service errors
// =============================================================================

/// Suggestions keyed on the gRPC status of a failed query.
#[must_use]
pub fn service_suggestions(err: &ServiceError) -> Vec<FixSuggestion> {
    let suggestion = match err.code {
        Code::NotFound => FixSuggestion::new(
            vec!["oraq actives".to_string(), "oraq exchange-rates".to_string()],
            format!(
                "The node has no entry for this {} query. Denoms are case-sensitive, \
                 and validators only appear after they have voted.",
                err.method
            ),
        ),
        Code::Unavailable => FixSuggestion::new(
            vec![
                "oraq config".to_string(),
                "oraq --node http://localhost:9090 actives".to_string(),
            ],
            format!(
                "The gRPC endpoint could not be reached: {}. The node may be down, \
                 or gRPC may be disabled in its app.toml.",
                err.message
            ),
        )
        .with_prevention(
            "Set `node.grpc_url` in the config file or ORAQ_NODE in your shell.",
        ),
        Code::DeadlineExceeded => FixSuggestion::new(
            vec!["ORAQ_TIMEOUT=60 oraq <command>".to_string()],
            "The node did not answer before the timeout expired.",
        )
        .with_prevention("Raise `node.timeout_seconds` for slow or distant nodes."),
        Code::Unimplemented => FixSuggestion::new(
            vec!["oraq --node <kujira-grpc-url> <command>".to_string()],
            format!(
                "The endpoint does not serve kujira.oracle.Query/{}. It may belong \
                 to a different chain.",
                err.method
            ),
        ),
        Code::InvalidArgument => FixSuggestion::new(
            vec!["oraq <command> --help".to_string()],
            format!("The node rejected the request: {}", err.message),
        ),
        _ => FixSuggestion::new(
            vec!["oraq --verbose <command>".to_string()],
            format!("The query failed with status {:?}: {}", err.code, err.message),
        ),
    };

    vec![suggestion.with_doc_url(GRPC_STATUS_DOC)]
}

// =============================================================================
// Configuration errors
// =============================================================================

/// Suggestions for a config path that does not exist.
#[must_use]
pub fn config_not_found_suggestions(path: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec!["unset ORAQ_CONFIG".to_string(), format!("touch {path}")],
            format!(
                "ORAQ_CONFIG points at {path}, which does not exist. Without it, \
                 oraq falls back to the default config location."
            ),
        )
        .auto_fixable(),
    ]
}

/// Suggestions for a config file that failed to parse.
#[must_use]
pub fn config_parse_suggestions(
    path: &str,
    line: Option<usize>,
    message: &str,
) -> Vec<FixSuggestion> {
    let line_info = line.map_or(String::new(), |l| format!(" on line {l}"));
    vec![
        FixSuggestion::new(
            vec![format!("$EDITOR {path}"), "oraq config".to_string()],
            format!("The config file has a syntax error{line_info}. The TOML parser reported: {message}"),
        )
        .with_prevention("Run `oraq config` after editing to confirm the file loads."),
    ]
}

/// Suggestions for a config value that failed validation.
#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["oraq config".to_string()],
        format!("Invalid config value for '{key}': '{value}'. {message}"),
    )]
}
