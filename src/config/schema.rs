//! Configuration schema for the launcher
//!
//! Nothing here is read from disk: the toolchain identity is fixed at build
//! time and the rest comes from `GO_APE_*` environment variables.

use crate::payload::PayloadLocation;

/// Toolchain identity, which determines the cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Application name (`go`)
    pub name: String,

    /// Publisher, only used in Windows paths (`golang`)
    pub author: String,

    /// Version of the bundled payload
    pub version: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            name: "go".to_string(),
            author: "golang".to_string(),
            version: env!("GO_APE_VERSION").to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name, defaulting to text for anything unknown
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "go_ape=warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Toolchain to install and launch
    pub toolchain: Toolchain,

    /// Payload to install from
    pub payload: PayloadLocation,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            payload: PayloadLocation::Embedded,
            logging: LoggingConfig::default(),
        }
    }
}
