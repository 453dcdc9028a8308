//! oraq - Oracle Query
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use oraq::cli::{Cli, Commands, OutputFormat};
use oraq::core::logging::{self, LogSettings};
use oraq::storage::config::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&LogSettings::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
    ));

    // Until the config is resolved, errors render with the CLI flags alone.
    let mut format = cli.cli_format().unwrap_or_default();
    let mut no_color = cli.no_color;
    let mut pretty = cli.pretty;

    let result = match ResolvedConfig::resolve(&cli) {
        Ok(config) => {
            format = config.format;
            no_color = config.no_color;
            pretty = config.pretty;
            run(&cli, &config).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!(
                "{}",
                oraq::render::error::render_error(&e, format, no_color, pretty)
            );
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: &Cli, config: &ResolvedConfig) -> oraq::Result<()> {
    match &cli.command {
        None => {
            print_quickstart(config.format);
            Ok(())
        }
        Some(Commands::Config) => oraq::cli::config::execute(config),
        Some(command) => match command.query() {
            Some((kind, args)) => oraq::cli::query::execute(kind, args, config).await,
            None => Ok(()),
        },
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart(format: OutputFormat) {
    if format != OutputFormat::Human {
        println!("Run `oraq --help` for usage.");
        return;
    }

    println!(
        r"oraq - Oracle Query

Query the Kujira oracle module over gRPC.

USAGE:
    oraq [OPTIONS] <COMMAND>

COMMANDS:
    exchange-rates [denom]           Current exchange rates, or one denom
    actives                          Assets the oracle tracks
    params                           Oracle module parameters
    feeder <validator>               Feeder account of a validator
    miss <validator>                 Missed vote periods of a validator
    aggregate-prevotes [validator]   Outstanding aggregate prevotes
    aggregate-votes [validator]      Outstanding aggregate votes
    config                           Show the resolved configuration

QUICK START:
    oraq exchange-rates                          # All rates from a local node
    oraq exchange-rates KUJI --node https://...  # One rate from a remote node
    oraq miss kujiravaloper1...                  # Miss counter of a validator
    oraq params --height 1000000                 # Params at a past height

ROBOT MODE:
    oraq actives --json           # JSON output
    oraq params --format md       # Markdown output

For more help: oraq --help
"
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
