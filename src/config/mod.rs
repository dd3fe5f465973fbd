//! Configuration management for the launcher

pub mod schema;

pub use schema::{LauncherConfig, LogFormat, LoggingConfig, Toolchain};

use crate::payload::PayloadLocation;
use std::ffi::OsString;
use std::path::PathBuf;

/// Overrides the log filter (any `EnvFilter` directive)
pub const ENV_LOG: &str = "GO_APE_LOG";

/// Selects `text` or `json` log output
pub const ENV_LOG_FORMAT: &str = "GO_APE_LOG_FORMAT";

/// Path to a zip file or directory used instead of the embedded payload
pub const ENV_PAYLOAD: &str = "GO_APE_PAYLOAD";

impl LauncherConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(crate::cache::process_env)
    }

    /// Load configuration through an environment lookup function
    pub fn from_lookup<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |name: &str| env(name).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(filter) = var(ENV_LOG) {
            config.logging.filter = filter.to_string_lossy().into_owned();
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            config.logging.format = LogFormat::parse(&format.to_string_lossy());
        }
        if let Some(path) = var(ENV_PAYLOAD) {
            config.payload = PayloadLocation::Path(PathBuf::from(path));
        }

        config
    }
}
