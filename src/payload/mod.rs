//! Bundled toolchain payload
//!
//! The payload holds one shared tree and one tree per supported platform,
//! each under a fixed top-level name. Release builds carry it as a zip
//! archive appended to the launcher executable (see [`bundle`]); a zip file
//! or an unpacked directory can stand in for it during development.
//!
//! ```text
//! go.common/          platform independent files (src, lib, ...)
//! go.linux-amd64/     bin/go, pkg/tool/..., one per supported platform
//! ```

mod archive;
pub mod bundle;
mod directory;

pub use archive::ZipPayload;
pub use directory::DirPayload;

use crate::error::{LauncherError, LauncherResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tree copied on every platform
pub const COMMON_PAYLOAD: &str = "go.common";

/// All top-level entries a complete payload provides
pub const PAYLOAD_ENTRIES: &[&str] = &[
    COMMON_PAYLOAD,
    "go.windows-amd64",
    "go.darwin-amd64",
    "go.linux-amd64",
    "go.windows-arm64",
    "go.darwin-arm64",
    "go.linux-arm64",
];

/// A read-only source of payload trees
pub trait PayloadSource {
    /// Copy the contents of the tree `name` into `dest`, merging with
    /// directories already there. Existing files are never overwritten.
    ///
    /// Returns the number of files copied.
    fn copy_tree(&mut self, name: &str, dest: &Path) -> io::Result<u64>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Where the payload should be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadLocation {
    /// Zip archive appended to the running executable
    Embedded,
    /// Explicit zip file or unpacked directory
    Path(PathBuf),
}

impl PayloadLocation {
    /// Open the payload. Only called when an install is needed.
    pub fn open(&self) -> LauncherResult<Box<dyn PayloadSource>> {
        match self {
            Self::Embedded => {
                let exe = std::env::current_exe()
                    .map_err(|e| LauncherError::copy("locating the launcher executable", e))?;
                debug!("Reading embedded payload from {}", exe.display());
                Ok(Box::new(ZipPayload::open_bundle(&exe)?))
            }
            Self::Path(path) if path.is_dir() => Ok(Box::new(DirPayload::new(path.clone()))),
            Self::Path(path) => Ok(Box::new(ZipPayload::open(path)?)),
        }
    }
}

/// Create a new file for payload content, refusing to replace one.
pub(crate) fn create_payload_file(target: &Path) -> io::Result<fs::File> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is provided by more than one payload tree", target.display()),
                )
            } else {
                e
            }
        })
}

/// Error for a tree the payload does not contain
pub(crate) fn missing_tree(name: &str, source: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("payload tree {name} not found in {source}"),
    )
}
