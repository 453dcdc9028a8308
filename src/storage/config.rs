//! Configuration file loading and resolution.
//!
//! Loads configuration from:
//! - Linux: `~/.config/oraq/config.toml`
//! - macOS: `~/Library/Application Support/network.kujira.oraq/config.toml`
//! - Windows: `%APPDATA%/kujira/oraq/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `ORAQ_NODE`: gRPC endpoint URL
//! - `ORAQ_TIMEOUT`: Request timeout in seconds
//! - `ORAQ_VALOPER_PREFIX`: Validator operator address prefix
//! - `ORAQ_FORMAT`: Output format (human, json, md)
//! - `ORAQ_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `ORAQ_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `ORAQ_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat};
use crate::core::address::{self, DEFAULT_VALOPER_PREFIX};
use crate::error::{OraqError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the gRPC endpoint.
pub const ENV_NODE: &str = "ORAQ_NODE";
/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "ORAQ_TIMEOUT";
/// Environment variable for the validator address prefix.
pub const ENV_VALOPER_PREFIX: &str = "ORAQ_VALOPER_PREFIX";
/// Environment variable for output format.
pub const ENV_FORMAT: &str = "ORAQ_FORMAT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "ORAQ_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "ORAQ_PRETTY";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "ORAQ_CONFIG";

/// Default gRPC endpoint of a local node.
pub const DEFAULT_GRPC_URL: &str = "http://localhost:9090";
/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Largest accepted timeout.
pub const MAX_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// gRPC endpoint URL.
    pub node_url: String,
    /// Request and connect timeout.
    pub timeout: Duration,
    /// Block height to query at (CLI only; `None` or 0 means latest).
    pub height: Option<u64>,
    /// Bech32 prefix of validator operator addresses.
    pub valoper_prefix: String,
    /// Output format.
    pub format: OutputFormat,
    /// Whether to disable colored output.
    pub no_color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    /// Config file consulted.
    pub config_path: PathBuf,
    /// Whether that file existed.
    pub config_loaded: bool,
    /// Source of each setting.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub node_url: ConfigSource,
    pub timeout: ConfigSource,
    pub valoper_prefix: ConfigSource,
    pub format: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly requested config file does not exist
    /// - The config file exists but is invalid
    /// - Any resolved value is invalid
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let (config_path, explicit) = Self::config_path(cli);
        let config_loaded = config_path.exists();
        if explicit && !config_loaded {
            return Err(OraqError::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let config = Config::load_from(&config_path)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let node_url = Self::resolve_node_url(cli, &config, &mut sources.node_url);
        let timeout = Self::resolve_timeout(cli, &config, &mut sources.timeout)?;
        let valoper_prefix =
            Self::resolve_valoper_prefix(cli, &config, &mut sources.valoper_prefix);
        let format = Self::resolve_format(cli, &config, &mut sources.format)?;
        let no_color = Self::resolve_no_color(cli, &config, &mut sources.no_color);
        let pretty = Self::resolve_pretty(cli, &config, &mut sources.pretty);

        let resolved = Self {
            node_url,
            timeout,
            height: cli.height,
            valoper_prefix,
            format,
            no_color,
            pretty,
            config_path,
            config_loaded,
            sources,
        };
        resolved.validate()?;

        tracing::debug!(
            node = %resolved.node_url,
            node_source = %resolved.sources.node_url,
            timeout_secs = resolved.timeout.as_secs(),
            prefix = %resolved.valoper_prefix,
            "Resolved configuration"
        );

        Ok(resolved)
    }

    /// Config file to read, and whether it was asked for explicitly.
    fn config_path(cli: &Cli) -> (PathBuf, bool) {
        if let Some(path) = &cli.config {
            return (path.clone(), true);
        }
        if let Some(path) = non_empty_env(ENV_CONFIG) {
            return (PathBuf::from(path), true);
        }
        (Config::config_path(), false)
    }

    fn resolve_node_url(cli: &Cli, config: &Config, source: &mut ConfigSource) -> String {
        // 1. CLI --node flag
        if let Some(node) = &cli.node {
            *source = ConfigSource::Cli;
            return node.trim().to_string();
        }

        // 2. Environment variable
        if let Some(node) = non_empty_env(ENV_NODE) {
            *source = ConfigSource::Env;
            return node;
        }

        // 3. Config file
        if let Some(url) = &config.node.grpc_url {
            *source = ConfigSource::ConfigFile;
            return url.clone();
        }

        // 4. Default
        *source = ConfigSource::Default;
        DEFAULT_GRPC_URL.to_string()
    }

    fn resolve_timeout(cli: &Cli, config: &Config, source: &mut ConfigSource) -> Result<Duration> {
        // 1. CLI --timeout flag
        if let Some(timeout) = cli.timeout {
            *source = ConfigSource::Cli;
            return Ok(Duration::from_secs(timeout));
        }

        // 2. Environment variable
        if let Some(timeout_env) = non_empty_env(ENV_TIMEOUT) {
            let timeout = timeout_env
                .parse::<u64>()
                .map_err(|_| OraqError::ConfigInvalid {
                    key: ENV_TIMEOUT.to_string(),
                    value: timeout_env.clone(),
                    message: "Timeout must be a whole number of seconds".to_string(),
                })?;
            *source = ConfigSource::Env;
            return Ok(Duration::from_secs(timeout));
        }

        // 3. Config file
        if let Some(seconds) = config.node.timeout_seconds {
            *source = ConfigSource::ConfigFile;
            return Ok(Duration::from_secs(seconds));
        }

        // 4. Default
        *source = ConfigSource::Default;
        Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    fn resolve_valoper_prefix(cli: &Cli, config: &Config, source: &mut ConfigSource) -> String {
        if let Some(prefix) = &cli.valoper_prefix {
            *source = ConfigSource::Cli;
            return prefix.trim().to_string();
        }

        if let Some(prefix) = non_empty_env(ENV_VALOPER_PREFIX) {
            *source = ConfigSource::Env;
            return prefix;
        }

        if let Some(prefix) = &config.chain.valoper_prefix {
            *source = ConfigSource::ConfigFile;
            return prefix.clone();
        }

        *source = ConfigSource::Default;
        DEFAULT_VALOPER_PREFIX.to_string()
    }

    fn resolve_format(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        // 1. CLI --format / --json
        if let Some(format) = cli.cli_format() {
            *source = ConfigSource::Cli;
            return Ok(format);
        }

        // 2. Environment variable
        if let Some(format_env) = non_empty_env(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return parse_format(ENV_FORMAT, &format_env);
        }

        // 3. Config file
        if let Some(format_str) = &config.output.format {
            *source = ConfigSource::ConfigFile;
            return parse_format("output.format", format_str);
        }

        // 4. Default
        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    fn resolve_no_color(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        // 1. CLI --no-color flag
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }

        // 2. Environment variable (ORAQ_NO_COLOR or standard NO_COLOR)
        if is_env_truthy(ENV_NO_COLOR) || non_empty_env(ENV_NO_COLOR_STD).is_some() {
            *source = ConfigSource::Env;
            return true;
        }

        // 3. Config file (inverted: output.color = false means no_color = true)
        if let Some(color) = config.output.color {
            *source = ConfigSource::ConfigFile;
            return !color;
        }

        // 4. Default
        *source = ConfigSource::Default;
        false
    }

    fn resolve_pretty(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_PRETTY) {
            *source = ConfigSource::Env;
            return true;
        }

        if let Some(pretty) = config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return pretty;
        }

        *source = ConfigSource::Default;
        false
    }

    /// Validate values that may have come from CLI or environment.
    fn validate(&self) -> Result<()> {
        validate_node_url(&self.sources.node_url.to_string(), &self.node_url)?;
        validate_timeout(self.timeout.as_secs())?;
        validate_prefix(&self.valoper_prefix)?;
        Ok(())
    }
}

/// Read an environment variable, treating blank values as unset.
fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var: &str) -> bool {
    std::env::var(var)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn parse_format(key: &str, value: &str) -> Result<OutputFormat> {
    OutputFormat::from_arg(value).ok_or_else(|| OraqError::ConfigInvalid {
        key: key.to_string(),
        value: value.to_string(),
        message: "Valid formats: human, json, md".to_string(),
    })
}

fn validate_node_url(key: &str, url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(OraqError::ConfigInvalid {
            key: format!("node.grpc_url ({key})"),
            value: url.to_string(),
            message: "The gRPC endpoint must be an http:// or https:// URL".to_string(),
        }),
    }
}

fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECS {
        return Err(OraqError::ConfigInvalid {
            key: "node.timeout_seconds".to_string(),
            value: seconds.to_string(),
            message: format!("Timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
        });
    }
    Ok(())
}

fn validate_prefix(prefix: &str) -> Result<()> {
    address::validate_prefix(prefix).map_err(|e| OraqError::ConfigInvalid {
        key: "chain.valoper_prefix".to_string(),
        value: prefix.to_string(),
        message: e.to_string(),
    })
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration as written in the file.
///
/// Every value is optional; an absent key falls through to the built-in
/// default during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node connection settings.
    pub node: NodeConfig,
    /// Chain-specific settings.
    pub chain: ChainConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Node connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// gRPC endpoint URL.
    pub grpc_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Chain-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Bech32 prefix of validator operator addresses.
    pub valoper_prefix: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    /// Whether to use colors in output.
    pub color: Option<bool>,
    /// Whether to pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| OraqError::ConfigParse {
            path: path.display().to_string(),
            line: e.span().map(|span| line_of(&content, span.start)),
            message: e.message().to_string(),
        })
    }

    /// Get the default config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - The gRPC URL is http(s)
    /// - The validator prefix is a usable bech32 prefix
    /// - Output format is valid (human, json, md)
    /// - Timeout is within bounds (1-300 seconds)
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.node.grpc_url {
            validate_node_url("config file", url)?;
        }
        if let Some(prefix) = &self.chain.valoper_prefix {
            validate_prefix(prefix)?;
        }
        if let Some(format) = &self.output.format {
            parse_format("output.format", format)?;
        }
        if let Some(seconds) = self.node.timeout_seconds {
            validate_timeout(seconds)?;
        }
        Ok(())
    }
}

/// 1-based line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
