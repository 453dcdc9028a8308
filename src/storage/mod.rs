//! Storage for configuration.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_CONFIG, ENV_FORMAT, ENV_NO_COLOR, ENV_NO_COLOR_STD,
    ENV_NODE, ENV_PRETTY, ENV_TIMEOUT, ENV_VALOPER_PREFIX, ResolvedConfig,
};
pub use paths::AppPaths;
