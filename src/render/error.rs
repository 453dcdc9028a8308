//! Error rendering.
//!
//! Errors always go to stderr. A TTY gets a panel with fix suggestions,
//! anything else gets a single `Error [CODE]: message` line, and the robot
//! formats get a JSON object.

use crate::cli::args::OutputFormat;
use crate::error::{FixSuggestion, OraqError};
use crate::rich::{ThemeConfig, create_default_theme, segments_to_string, should_use_rich_output};
use rich_rust::prelude::*;
use rich_rust::Segment;

// =============================================================================
// Public API
// =============================================================================

/// Render an error for the given output settings.
#[must_use]
pub fn render_error(error: &OraqError, format: OutputFormat, no_color: bool, pretty: bool) -> String {
    match format {
        OutputFormat::Json => return render_error_json(error, pretty),
        OutputFormat::Md => return render_error_json(error, true),
        OutputFormat::Human => {}
    }

    // The gate looks at stdout; errors go to stderr, which is checked too.
    let use_rich = should_use_rich_output(format, no_color) && crate::util::env::stderr_is_tty();

    if use_rich {
        render_rich(error)
    } else {
        render_simple(error)
    }
}

/// Render error as structured JSON.
#[must_use]
pub fn render_error_json(error: &OraqError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Rich Terminal Rendering
// =============================================================================

fn render_rich(error: &OraqError) -> String {
    let theme = create_default_theme();
    let suggestions = error.fix_suggestions();

    let mut lines: Vec<String> = vec![render_header(error, &theme), String::new()];

    if !suggestions.is_empty() {
        lines.push(render_suggestions_section(&suggestions, &theme));
    }

    if let Some(first) = suggestions.first() {
        if !first.context.is_empty() {
            lines.push(String::new());
            lines.push(render_titled_text("Why this happened:", &first.context, &theme.secondary));
        }
        if let Some(prevention) = &first.prevention {
            lines.push(String::new());
            lines.push(render_titled_text("Prevention:", prevention, &theme.success));
        }
        if let Some(doc_url) = &first.doc_url {
            lines.push(String::new());
            lines.push(segments_to_string(&[
                Segment::styled("Docs: ".to_string(), theme.muted.clone()),
                Segment::styled(doc_url.clone(), theme.link.clone()),
            ]));
        }
    }

    render_error_panel(&lines.join("\n"), error, &theme)
}

fn render_header(error: &OraqError, theme: &ThemeConfig) -> String {
    segments_to_string(&[
        Segment::styled(error.to_string(), theme.error.clone()),
        Segment::styled(format!(" [{}]", error.error_code()), theme.muted.clone()),
    ])
}

fn render_suggestions_section(suggestions: &[FixSuggestion], theme: &ThemeConfig) -> String {
    let mut lines = vec![segments_to_string(&[Segment::styled(
        "How to fix:".to_string(),
        theme.primary.clone(),
    )])];

    for (i, suggestion) in suggestions.iter().enumerate() {
        for (j, cmd) in suggestion.commands.iter().enumerate() {
            let prefix = if j == 0 {
                format!("  {}. ", i + 1)
            } else {
                "     Or: ".to_string()
            };
            lines.push(segments_to_string(&[
                Segment::plain(prefix),
                Segment::styled(cmd.clone(), theme.command.clone()),
            ]));
        }
    }

    lines.join("\n")
}

fn render_titled_text(title: &str, body: &str, style: &Style) -> String {
    let mut lines = vec![segments_to_string(&[Segment::styled(
        title.to_string(),
        style.clone(),
    )])];
    lines.extend(wrap_text(body, 60).into_iter().map(|line| format!("  {line}")));
    lines.join("\n")
}

fn render_error_panel(content: &str, error: &OraqError, theme: &ThemeConfig) -> String {
    let content_lines: Vec<Vec<Segment>> = content
        .lines()
        .map(|line| vec![Segment::plain(line.to_string())])
        .collect();

    let panel = Panel::new(content_lines)
        .title(Text::new(error.category().to_string()))
        .border_style(theme.panel_error_border.clone())
        .padding((1, 2));

    segments_to_string(&panel.render(70))
}

// =============================================================================
// Simple Text Rendering
// =============================================================================

/// Render error as plain text: the message, then the first runnable fix.
fn render_simple(error: &OraqError) -> String {
    let mut lines = vec![format!("Error [{}]: {}", error.error_code(), error)];

    let fix = error
        .fix_suggestions()
        .into_iter()
        .flat_map(|s| s.commands)
        .find(|cmd| !cmd.starts_with('#'));
    if let Some(cmd) = fix {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON Rendering
// =============================================================================

#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: &'static str,
    category: String,
    message: String,
    exit_code: u8,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    grpc_code: Option<String>,
    suggestions: Vec<FixSuggestion>,
}

impl ErrorJson {
    fn from_error(error: &OraqError) -> Self {
        let grpc_code = match error {
            OraqError::Service(service) => Some(format!("{:?}", service.code)),
            _ => None,
        };

        Self {
            error_code: error.error_code(),
            category: error.category().to_string(),
            message: error.to_string(),
            exit_code: error.exit_code() as u8,
            is_retryable: error.is_retryable(),
            grpc_code,
            suggestions: error.fix_suggestions(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}
