//! Output rendering for human and robot modes.
//!
//! Every response is first reduced to its proto-JSON form: snake_case field
//! names, `uint64` values as strings and `Dec` values with 18 decimals. The
//! format then decides how that tree is printed.

pub mod error;
pub mod human;
pub mod robot;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::core::router::{QueryKind, QueryResponse};
use crate::error::Result;

/// Render a query response.
pub fn render_response(
    response: &QueryResponse,
    kind: QueryKind,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    render_value(response, kind.command(), format, pretty, no_color)
}

/// Render any serializable value under a section heading.
///
/// The heading only appears in Markdown output.
pub fn render_value<T: Serialize>(
    value: &T,
    heading: &str,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_yaml(value, no_color),
        OutputFormat::Json => robot::render_json(value, pretty),
        OutputFormat::Md => robot::render_md(value, heading),
    }
}
