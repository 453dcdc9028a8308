//! Human-readable output.
//!
//! Responses print as YAML, matching the text output of the chain's own CLI.
//! On an interactive terminal the keys are highlighted.

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::rich::{ThemeConfig, create_default_theme, segments_to_string, should_use_rich_output};
use rich_rust::Segment;

/// Render a value as YAML.
pub fn render_yaml<T: Serialize>(value: &T, no_color: bool) -> Result<String> {
    let yaml = serde_yaml::to_string(value)?;
    let yaml = yaml.trim_end();

    if should_use_rich_output(OutputFormat::Human, no_color) {
        let theme = create_default_theme();
        Ok(style_yaml(yaml, &theme))
    } else {
        Ok(yaml.to_string())
    }
}

fn style_yaml(yaml: &str, theme: &ThemeConfig) -> String {
    yaml.lines()
        .map(|line| style_line(line, theme))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlight the mapping key of a single YAML line, if it has one.
fn style_line(line: &str, theme: &ThemeConfig) -> String {
    let body = line.trim_start_matches(' ');
    let body = body.strip_prefix("- ").unwrap_or(body);
    let lead = &line[..line.len() - body.len()];

    match body.split_once(':') {
        Some((key, rest)) if is_plain_key(key) => segments_to_string(&[
            Segment::plain(lead.to_string()),
            Segment::styled(key.to_string(), theme.primary.clone()),
            Segment::plain(format!(":{rest}")),
        ]),
        _ => line.to_string(),
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
