//! `oraq config`: show the resolved configuration.

use serde::Serialize;

use crate::error::Result;
use crate::render;
use crate::storage::config::{ConfigSource, ResolvedConfig};

/// A resolved value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting<T> {
    pub value: T,
    pub source: String,
}

impl<T> Setting<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Self {
            value,
            source: source.to_string(),
        }
    }
}

/// Serializable view of a [`ResolvedConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigView {
    pub config_file: String,
    pub config_file_found: bool,
    pub node: Setting<String>,
    pub timeout_seconds: Setting<u64>,
    pub valoper_prefix: Setting<String>,
    pub format: Setting<&'static str>,
    pub no_color: Setting<bool>,
    pub pretty: Setting<bool>,
}

impl From<&ResolvedConfig> for ConfigView {
    fn from(config: &ResolvedConfig) -> Self {
        let sources = &config.sources;
        Self {
            config_file: config.config_path.display().to_string(),
            config_file_found: config.config_loaded,
            node: Setting::new(config.node_url.clone(), sources.node_url),
            timeout_seconds: Setting::new(config.timeout.as_secs(), sources.timeout),
            valoper_prefix: Setting::new(config.valoper_prefix.clone(), sources.valoper_prefix),
            format: Setting::new(config.format.as_str(), sources.format),
            no_color: Setting::new(config.no_color, sources.no_color),
            pretty: Setting::new(config.pretty, sources.pretty),
        }
    }
}

/// Print the resolved configuration. Makes no network call.
pub fn execute(config: &ResolvedConfig) -> Result<()> {
    let view = ConfigView::from(config);
    let output =
        render::render_value(&view, "config", config.format, config.pretty, config.no_color)?;
    println!("{output}");
    Ok(())
}
