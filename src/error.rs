//! Error types for the launcher
//!
//! All modules use `LauncherResult<T>` as their return type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for launcher operations
pub type LauncherResult<T> = Result<T, LauncherError>;

/// Exit status for launcher failures that are not more specific
pub const EXIT_LAUNCHER_FAILURE: i32 = 125;

/// Exit status when the entry point exists but cannot be executed
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Exit status when the entry point does not exist
pub const EXIT_NOT_FOUND: i32 = 127;

/// All errors that can occur before control reaches the toolchain
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("{name} not set")]
    MissingEnvironmentVariable { name: &'static str },

    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to install toolchain: {context}: {source}")]
    CopyFailure {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to launch {}: {source}", program.display())]
    LaunchFailure {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} terminated abnormally: {detail}", program.display())]
    AbnormalChildTermination { program: PathBuf, detail: String },
}

impl LauncherError {
    /// Create a copy failure with context
    pub fn copy(context: impl Into<String>, source: io::Error) -> Self {
        Self::CopyFailure {
            context: context.into(),
            source,
        }
    }

    /// Create a launch failure for the given program
    pub fn launch(program: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LaunchFailure {
            program: program.into(),
            source,
        }
    }

    /// Create an unsupported platform error from raw identifiers
    pub fn unsupported(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Process exit status reported when this error aborts the launcher
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LaunchFailure { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => EXIT_LAUNCHER_FAILURE,
            },
            _ => EXIT_LAUNCHER_FAILURE,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingEnvironmentVariable { name: "LOCALAPPDATA" } => {
                Some("Set LOCALAPPDATA to your local application data folder")
            }
            Self::MissingEnvironmentVariable { .. } => {
                Some("Set HOME (or XDG_CACHE_HOME) to a writable directory")
            }
            Self::CopyFailure { .. } => {
                Some("The partial install was removed; check free disk space and rerun")
            }
            Self::LaunchFailure { .. } => {
                Some("Delete the toolchain cache directory to force a fresh install")
            }
            _ => None,
        }
    }
}
