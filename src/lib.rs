//! go-ape - Self-extracting Go toolchain launcher
//!
//! On first use the bundled toolchain is unpacked into the per-user cache
//! directory; every run then hands control to the cached `go` binary with
//! the original arguments.

pub mod cache;
pub mod config;
pub mod error;
pub mod handoff;
pub mod install;
pub mod payload;
pub mod platform;
pub mod ui;

pub use config::LauncherConfig;
pub use error::{LauncherError, LauncherResult};

use handoff::Handoff;
use install::Installer;
use platform::Platform;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Resolve the cache directory for `platform`, install into it if needed and
/// return the path of the toolchain entry point.
///
/// `env` looks up the variables that locate the cache root.
pub fn prepare<F>(config: &LauncherConfig, platform: Platform, env: F) -> LauncherResult<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let toolchain = &config.toolchain;
    let cache_dir = cache::user_cache_dir(
        platform.os(),
        &toolchain.name,
        &toolchain.author,
        &toolchain.version,
        env,
    )?;

    let outcome = Installer::new(platform, &toolchain.version)
        .with_ui(ui::UiContext::detect())
        .ensure_installed(&cache_dir, &config.payload)?;
    debug!("Install outcome: {:?}", outcome);

    Ok(platform.entry_point(&cache_dir))
}

/// Run the launcher with the process's own argument vector.
///
/// Returns the exit code to terminate with. On targets that replace the
/// process image this only returns on failure.
pub fn run(config: &LauncherConfig, args: &[OsString]) -> LauncherResult<i32> {
    let platform = Platform::detect()?;
    debug!("Detected platform {}, payload {:?}", platform, config.payload);

    let entry_point = prepare(config, platform, cache::process_env)?;
    Handoff::native().launch(&entry_point, args)
}
