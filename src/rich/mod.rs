//! Rich output module - wraps rich_rust for oraq-specific use.
//!
//! The gate in [`should_use_rich_output`] decides when styled terminal output
//! is allowed. Query results are frequently piped into `jq` or scripts, so
//! anything that is not an interactive human terminal gets plain text.

use crate::cli::args::OutputFormat;
use crate::util::env as env_util;

pub use rich_rust::prelude::*;
use rich_rust::{ColorSystem, Segment};

/// Env var that forces plain output regardless of terminal.
pub const PLAIN_ENV: &str = "ORAQ_PLAIN";

// =============================================================================
// Theme Configuration
// =============================================================================

/// Styles shared by the human renderers.
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Primary accent (section headers, keys).
    pub primary: Style,
    /// Secondary accent.
    pub secondary: Style,
    /// Success/positive color.
    pub success: Style,
    /// Error/danger color.
    pub error: Style,
    /// Muted/dimmed color.
    pub muted: Style,
    /// Copy-paste commands in suggestions.
    pub command: Style,
    /// Links.
    pub link: Style,
    /// Error panel border style.
    pub panel_error_border: Style,
}

/// Foreground style for a named color; unknown names yield an unstyled base.
#[must_use]
pub fn color_style(name: &str) -> Style {
    Color::parse(name).map_or_else(|_| Style::new(), |color| Style::new().color(color))
}

/// Default theme.
#[must_use]
pub fn create_default_theme() -> ThemeConfig {
    ThemeConfig {
        primary: color_style("cyan").bold(),
        secondary: color_style("blue"),
        success: color_style("green").bold(),
        error: color_style("red").bold(),
        muted: Style::new().dim(),
        command: color_style("cyan"),
        link: Style::new().underline(),
        panel_error_border: color_style("red"),
    }
}

// =============================================================================
// Safety Gates
// =============================================================================

/// Determine whether rich (styled) output should be written to stdout.
///
/// Rich output is disabled when any of these hold:
/// 1. format is not `human`
/// 2. `--no-color` was given (or `ORAQ_NO_COLOR` / `[output] color = false`)
/// 3. `NO_COLOR` is set (any value, per <https://no-color.org/>)
/// 4. `ORAQ_PLAIN` is set
/// 5. stdout is not a TTY
/// 6. `TERM=dumb`
/// 7. `CI` or `GITHUB_ACTIONS` is set
#[must_use]
pub fn should_use_rich_output(format: OutputFormat, no_color_flag: bool) -> bool {
    let reason = if format != OutputFormat::Human {
        Some("robot_mode")
    } else if no_color_flag {
        Some("no_color_flag")
    } else if env_util::no_color_env() {
        Some("no_color_env")
    } else if std::env::var_os(PLAIN_ENV).is_some() {
        Some("oraq_plain")
    } else if !env_util::stdout_is_tty() {
        Some("not_tty")
    } else if env_util::is_dumb_terminal() {
        Some("term_dumb")
    } else if env_util::is_ci() {
        Some("ci_environment")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::debug!(reason, decision = "disabled", "Rich output DISABLED");
            false
        }
        None => {
            tracing::debug!(decision = "enabled", "Rich output ENABLED");
            true
        }
    }
}

/// Render styled segments to a string with ANSI codes.
#[must_use]
pub fn segments_to_string(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|seg| match &seg.style {
            Some(style) => style.render(&seg.text, ColorSystem::TrueColor),
            None => seg.text.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_LOCK, contains_ansi, strip_ansi};
    use tracing_test::traced_test;

    #[allow(unsafe_code)]
    fn with_env_var(key: &str, value: &str, f: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let prior = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        f();
        match prior {
            Some(val) => unsafe {
                std::env::set_var(key, val);
            },
            None => unsafe {
                std::env::remove_var(key);
            },
        }
    }

    #[test]
    fn color_style_falls_back_for_unknown_names() {
        assert!(!color_style("red").is_null());
        assert!(color_style("not-a-color").is_null());
    }

    #[traced_test]
    #[test]
    fn json_format_disables_rich() {
        assert!(!should_use_rich_output(OutputFormat::Json, false));
        assert!(logs_contain("robot_mode"));
        assert!(logs_contain("DISABLED"));
    }

    #[traced_test]
    #[test]
    fn markdown_format_disables_rich() {
        assert!(!should_use_rich_output(OutputFormat::Md, false));
        assert!(logs_contain("robot_mode"));
    }

    #[traced_test]
    #[test]
    fn no_color_flag_disables_rich() {
        assert!(!should_use_rich_output(OutputFormat::Human, true));
        assert!(logs_contain("no_color_flag"));
    }

    #[traced_test]
    #[test]
    fn no_color_empty_value_still_disables() {
        with_env_var("NO_COLOR", "", || {
            assert!(!should_use_rich_output(OutputFormat::Human, false));
            assert!(logs_contain("no_color_env"));
        });
    }

    #[test]
    fn plain_env_disables_rich() {
        with_env_var(PLAIN_ENV, "1", || {
            assert!(!should_use_rich_output(OutputFormat::Human, false));
        });
    }

    #[test]
    fn ci_env_disables_rich() {
        with_env_var("CI", "true", || {
            assert!(!should_use_rich_output(OutputFormat::Human, false));
        });
    }

    #[test]
    fn segments_render_with_and_without_style() {
        let theme = create_default_theme();
        let rendered = segments_to_string(&[
            Segment::plain("key"),
            Segment::styled(": value".to_string(), theme.primary),
        ]);
        assert!(rendered.starts_with("key"));
        assert!(contains_ansi(&rendered));
        assert_eq!(strip_ansi(&rendered), "key: value");
    }
}
