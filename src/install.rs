//! Payload installation into the cache directory
//!
//! An existing cache directory is trusted without inspection. Otherwise the
//! directory is created and filled with the shared tree plus the tree for
//! the current platform. If anything fails along the way the directory is
//! removed again before the error is returned.

use crate::cache::InstallManifest;
use crate::error::{LauncherError, LauncherResult};
use crate::payload::{PayloadLocation, PayloadSource, COMMON_PAYLOAD};
use crate::platform::Platform;
use crate::ui::{InstallSpinner, UiContext};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of [`Installer::ensure_installed`]
#[derive(Debug)]
pub enum InstallOutcome {
    /// The cache directory already existed and was left untouched
    AlreadyCached,
    /// The payload was copied into a new cache directory
    Installed(InstallManifest),
}

/// Installs one toolchain version for one platform
pub struct Installer<'a> {
    platform: Platform,
    version: &'a str,
    ui: UiContext,
}

impl<'a> Installer<'a> {
    pub fn new(platform: Platform, version: &'a str) -> Self {
        Self {
            platform,
            version,
            ui: UiContext::non_interactive(),
        }
    }

    /// Show a spinner according to `ui` while copying
    pub fn with_ui(mut self, ui: UiContext) -> Self {
        self.ui = ui;
        self
    }

    /// Make sure `cache_dir` holds the toolchain, reading `payload` only
    /// when the directory does not exist yet.
    pub fn ensure_installed(
        &self,
        cache_dir: &Path,
        payload: &PayloadLocation,
    ) -> LauncherResult<InstallOutcome> {
        if cache_dir.exists() {
            debug!("Toolchain already cached at {}", cache_dir.display());
            if InstallManifest::load(cache_dir).is_none() {
                debug!(
                    "{} has no install marker; delete it if the toolchain is incomplete",
                    cache_dir.display()
                );
            }
            return Ok(InstallOutcome::AlreadyCached);
        }

        let spinner = InstallSpinner::start(
            &self.ui,
            &format!("Unpacking go {} into {}", self.version, cache_dir.display()),
        );

        match self.install_fresh(cache_dir, payload, &spinner) {
            Ok(manifest) => {
                spinner.finish(&format!("Installed go {} ({})", self.version, self.platform));
                info!("Installed toolchain into {}", cache_dir.display());
                Ok(InstallOutcome::Installed(manifest))
            }
            Err(e) => {
                spinner.fail("Toolchain install failed");
                if let Err(cleanup) = remove_partial_install(cache_dir) {
                    warn!(
                        "Failed to remove partial install {}: {}",
                        cache_dir.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    fn install_fresh(
        &self,
        cache_dir: &Path,
        payload: &PayloadLocation,
        spinner: &InstallSpinner,
    ) -> LauncherResult<InstallManifest> {
        fs::create_dir_all(cache_dir).map_err(|e| {
            LauncherError::copy(format!("creating {}", cache_dir.display()), e)
        })?;

        let mut source = payload.open()?;
        info!(
            "Installing {} payload from {}",
            self.platform,
            source.describe()
        );

        for tree in [COMMON_PAYLOAD, self.platform.payload()] {
            spinner.message(&format!("Copying {tree}"));
            copy_tree(source.as_mut(), tree, cache_dir)?;
        }

        let manifest = InstallManifest::new(
            self.version,
            self.platform.payload(),
            &self.platform.entry_point(cache_dir),
        )?;
        manifest.write(cache_dir)?;
        Ok(manifest)
    }
}

/// Remove whatever a failed install left behind. A directory that was
/// never created needs no cleanup.
fn remove_partial_install(cache_dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(cache_dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound || !cache_dir.exists() => Ok(()),
        other => other,
    }
}

fn copy_tree(source: &mut dyn PayloadSource, tree: &str, dest: &Path) -> LauncherResult<()> {
    let copied = source
        .copy_tree(tree, dest)
        .map_err(|e| LauncherError::copy(format!("copying {tree}"), e))?;
    debug!("{}: {} files", tree, copied);
    Ok(())
}
