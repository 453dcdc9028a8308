//! Isolated invocations of the `oraq` binary.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use oraq::test_utils::TestDir;

/// Environment variables that would leak the developer's setup into a test.
const SCRUBBED_ENV: &[&str] = &[
    "ORAQ_NODE",
    "ORAQ_TIMEOUT",
    "ORAQ_VALOPER_PREFIX",
    "ORAQ_FORMAT",
    "ORAQ_NO_COLOR",
    "ORAQ_PRETTY",
    "ORAQ_CONFIG",
    "ORAQ_LOG",
    "ORAQ_LOG_FORMAT",
    "ORAQ_LOG_FILE",
    "RUST_LOG",
];

/// Node address nothing listens on.
pub const DEAD_NODE: &str = "http://127.0.0.1:1";

/// A config file in a private temp directory plus a command factory.
pub struct Sandbox {
    dir: TestDir,
    config: PathBuf,
}

impl Sandbox {
    /// Sandbox with an empty config file (all defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config("")
    }

    #[must_use]
    pub fn with_config(toml: &str) -> Self {
        let dir = TestDir::new();
        let config = dir.create_file("config.toml", toml);
        Self { dir, config }
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// `oraq --config <sandbox config>` with a scrubbed environment.
    #[must_use]
    pub fn cmd(&self) -> Command {
        let mut cmd = Self::bare_cmd();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    /// `oraq` with a scrubbed environment and no config flag.
    #[allow(deprecated)]
    #[must_use]
    pub fn bare_cmd() -> Command {
        let mut cmd = Command::cargo_bin("oraq").expect("oraq binary is built");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
