//! Per-user cache directory resolution
//!
//! Follows each platform's convention so that caches created by earlier
//! launchers of the same version are found again:
//!
//! | OS | Path |
//! |----|------|
//! | Windows | `%LOCALAPPDATA%/<author>/<app>/Cache/<version>` |
//! | macOS | `$HOME/Library/Caches/<app>/<version>` |
//! | other | `$XDG_CACHE_HOME/<app>/<version>` or `$HOME/.cache/<app>/<version>` |
//!
//! Resolution reads environment variables only and never touches the disk.

use crate::error::{LauncherError, LauncherResult};
use crate::platform::Os;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Read a variable from the process environment
pub fn process_env(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}

/// Resolve the cache directory for `appname` at `version`.
///
/// `env` looks up environment variables; pass [`process_env`] outside tests.
/// Empty values are treated the same as unset ones.
pub fn user_cache_dir<F>(
    os: Os,
    appname: &str,
    appauthor: &str,
    version: &str,
    env: F,
) -> LauncherResult<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let var = |name: &'static str| env(name).filter(|v| !v.is_empty());
    let require = |name: &'static str| {
        var(name)
            .map(PathBuf::from)
            .ok_or(LauncherError::MissingEnvironmentVariable { name })
    };

    let dir = match os {
        Os::Windows => require("LOCALAPPDATA")?
            .join(appauthor)
            .join(appname)
            .join("Cache")
            .join(version),
        Os::MacOs => require("HOME")?
            .join("Library")
            .join("Caches")
            .join(appname)
            .join(version),
        Os::Linux => {
            let cache_home = match var("XDG_CACHE_HOME") {
                Some(xdg) => PathBuf::from(xdg),
                None => require("HOME")?.join(".cache"),
            };
            cache_home.join(appname).join(version)
        }
    };

    debug!("Resolved cache directory: {}", dir.display());
    Ok(dir)
}
