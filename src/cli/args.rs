//! CLI argument definitions using clap.
//!
//! Positional arguments are collected without a count limit; each query
//! command checks its own arity so every count mismatch is reported the
//! same way.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::router::QueryKind;

/// Oracle Query - query the Kujira oracle module over gRPC.
#[derive(Parser, Debug)]
#[command(name = "oraq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Output flags ===
    /// Output format [default: human]
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    // === Query flags ===
    /// gRPC endpoint of the node [default: http://localhost:9090]
    #[arg(long, value_name = "URL", global = true)]
    pub node: Option<String>,

    /// Query state at this block height (0 = latest)
    #[arg(long, value_name = "HEIGHT", global = true)]
    pub height: Option<u64>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Bech32 prefix of validator operator addresses [default: kujiravaloper]
    #[arg(long, value_name = "PREFIX", global = true)]
    pub valoper_prefix: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    // === Logging flags ===
    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Output format given on the command line, if any.
    #[must_use]
    pub const fn cli_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the current exchange rate of an asset
    #[command(long_about = "Query the current exchange rate of an asset.\n\n\
        With no argument, lists the rate of every active denom:\n\n    \
        $ oraq exchange-rates\n\n\
        Or filter by denom:\n\n    \
        $ oraq exchange-rates KUJI")]
    ExchangeRates(DenomArgs),

    /// Query the active list of assets recognized by the oracle
    Actives(NoArgs),

    /// Query the current oracle params
    Params(NoArgs),

    /// Query the account a validator's oracle voting right is delegated to
    Feeder(ValidatorArgs),

    /// Query the number of vote periods missed in this slash window
    Miss(ValidatorArgs),

    /// Query outstanding oracle aggregate prevotes
    #[command(long_about = "Query outstanding oracle aggregate prevotes.\n\n    \
        $ oraq aggregate-prevotes\n\n\
        Or filter by validator operator address:\n\n    \
        $ oraq aggregate-prevotes kujiravaloper1...")]
    AggregatePrevotes(ValidatorArgs),

    /// Query outstanding oracle aggregate votes
    #[command(long_about = "Query outstanding oracle aggregate votes.\n\n    \
        $ oraq aggregate-votes\n\n\
        Or filter by validator operator address:\n\n    \
        $ oraq aggregate-votes kujiravaloper1...")]
    AggregateVotes(ValidatorArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

impl Commands {
    /// The query this command runs and its positional arguments.
    ///
    /// `None` for commands that do not query the node.
    #[must_use]
    pub fn query(&self) -> Option<(QueryKind, &[String])> {
        match self {
            Self::ExchangeRates(args) => Some((QueryKind::ExchangeRates, args.denom.as_slice())),
            Self::Actives(args) => Some((QueryKind::Actives, args.extra.as_slice())),
            Self::Params(args) => Some((QueryKind::Params, args.extra.as_slice())),
            Self::Feeder(args) => Some((QueryKind::Feeder, args.validator.as_slice())),
            Self::Miss(args) => Some((QueryKind::Miss, args.validator.as_slice())),
            Self::AggregatePrevotes(args) => {
                Some((QueryKind::AggregatePrevotes, args.validator.as_slice()))
            }
            Self::AggregateVotes(args) => {
                Some((QueryKind::AggregateVotes, args.validator.as_slice()))
            }
            Self::Config => None,
        }
    }
}

/// Positional arguments for `exchange-rates`.
#[derive(Args, Debug, Default)]
pub struct DenomArgs {
    /// Denom to look up; omit to list all
    #[arg(value_name = "DENOM")]
    pub denom: Vec<String>,
}

/// Positional arguments for validator-scoped commands.
#[derive(Args, Debug, Default)]
pub struct ValidatorArgs {
    /// Validator operator address (bech32)
    #[arg(value_name = "VALIDATOR")]
    pub validator: Vec<String>,
}

/// Commands without positional arguments.
///
/// Stray arguments are still collected so they can be rejected with the
/// usual argument-count error.
#[derive(Args, Debug, Default)]
pub struct NoArgs {
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// YAML text, like the chain's own CLI
    #[default]
    Human,
    /// Proto-JSON
    Json,
    /// Markdown
    Md,
}

impl OutputFormat {
    /// Parse a config or environment value.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "text" => Some(Self::Human),
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Md => "md",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("oraq").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exchange_rates_collects_denom() {
        let cli = parse(&["exchange-rates", "KUJI"]);
        let command = cli.command.unwrap();
        let (kind, args) = command.query().unwrap();
        assert_eq!(kind, QueryKind::ExchangeRates);
        assert_eq!(args, ["KUJI".to_string()]);
    }

    #[test]
    fn extra_arguments_reach_arity_check() {
        let cli = parse(&["actives", "KUJI"]);
        let command = cli.command.unwrap();
        let (kind, args) = command.query().unwrap();
        assert_eq!(kind, QueryKind::Actives);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["miss", "kujiravaloper1x", "--json", "--height", "100"]);
        assert_eq!(cli.cli_format(), Some(OutputFormat::Json));
        assert_eq!(cli.height, Some(100));
    }

    #[test]
    fn format_defaults_to_unset() {
        let cli = parse(&["params"]);
        assert_eq!(cli.cli_format(), None);
    }

    #[test]
    fn config_command_has_no_query() {
        let cli = parse(&["config"]);
        assert!(cli.command.unwrap().query().is_none());
    }

    #[test]
    fn subcommand_names_match_query_kinds() {
        let command = Cli::command();
        for kind in QueryKind::ALL {
            assert!(
                command.find_subcommand(kind.command()).is_some(),
                "missing subcommand {}",
                kind.command()
            );
        }
    }

    #[test]
    fn output_format_from_arg() {
        assert_eq!(OutputFormat::from_arg("Markdown"), Some(OutputFormat::Md));
        assert_eq!(OutputFormat::from_arg("text"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_arg("xml"), None);
    }
}
