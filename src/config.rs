//! Runtime configuration, read once from the environment.

use std::env;

use crate::errors::TapError;
use crate::grammar::DEFAULT_VERSION;

pub const SELF_TEST_VAR: &str = "TAPLET_SELF_TEST";
pub const BACKTRACE_VAR: &str = "TAPLET_BACKTRACE";

/// What `bail` does after writing its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BailMode {
    /// Count a failure, print the report, and end the process.
    #[default]
    Exit,
    /// Return `TapError::Bail` so an in-process harness can intercept it.
    Raise,
}

/// How stack traces in diagnostic blocks are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BacktraceMode {
    /// Follow `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub version: u32,
    pub bail: BailMode,
    pub backtrace: BacktraceMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            bail: BailMode::Exit,
            backtrace: BacktraceMode::Auto,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, TapError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(SELF_TEST_VAR) {
            config.bail = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => BailMode::Raise,
                "" | "0" | "false" | "no" | "off" => BailMode::Exit,
                _ => {
                    return Err(TapError::Config {
                        var: SELF_TEST_VAR,
                        value,
                        help: Some("expected a boolean such as 1, true, 0 or false".to_string()),
                    })
                }
            };
        }

        if let Some(value) = lookup(BACKTRACE_VAR) {
            config.backtrace = match value.trim().to_ascii_lowercase().as_str() {
                "" | "auto" => BacktraceMode::Auto,
                "always" => BacktraceMode::Always,
                "never" => BacktraceMode::Never,
                _ => {
                    return Err(TapError::Config {
                        var: BACKTRACE_VAR,
                        value,
                        help: Some("expected one of: auto, always, never".to_string()),
                    })
                }
            };
        }

        Ok(config)
    }

    /// Config for in-process self-tests: `bail` raises instead of exiting.
    pub fn self_test() -> Self {
        Self {
            bail: BailMode::Raise,
            ..Self::default()
        }
    }
}
