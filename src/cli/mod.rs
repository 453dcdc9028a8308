//! CLI argument parsing and command dispatch.

pub mod args;
pub mod config;
pub mod query;

pub use args::{Cli, Commands, OutputFormat};
