//! Install completion marker
//!
//! Written as the last step of an install, so its presence means both
//! payload trees were copied completely. The cache directory itself stays
//! the only signal the launcher acts on; the marker is used for diagnostics.

use crate::error::{LauncherError, LauncherResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File name of the marker inside the cache directory
pub const MANIFEST_FILE: &str = ".go-ape.json";

/// Record of a completed install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Toolchain version the directory was populated for
    pub version: String,

    /// Platform payload tree that was copied (e.g. `go.linux-amd64`)
    pub payload: String,

    /// When the install finished
    pub installed_at: DateTime<Utc>,

    /// SHA-256 of the entry point at install time
    pub entry_point_sha256: String,
}

impl InstallManifest {
    /// Build a manifest for a freshly populated directory
    pub fn new(version: &str, payload: &str, entry_point: &Path) -> LauncherResult<Self> {
        let entry_point_sha256 = sha256_file(entry_point).map_err(|e| {
            LauncherError::copy(format!("hashing {}", entry_point.display()), e)
        })?;

        Ok(Self {
            version: version.to_string(),
            payload: payload.to_string(),
            installed_at: Utc::now(),
            entry_point_sha256,
        })
    }

    /// Path of the marker for a cache directory
    pub fn path(cache_dir: &Path) -> PathBuf {
        cache_dir.join(MANIFEST_FILE)
    }

    /// Load the marker, returning `None` if it is absent or unreadable
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(Self::path(cache_dir)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Write the marker into the cache directory
    pub fn write(&self, cache_dir: &Path) -> LauncherResult<()> {
        let path = Self::path(cache_dir);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LauncherError::copy("serializing install manifest", e.into()))?;
        fs::write(&path, content)
            .map_err(|e| LauncherError::copy(format!("writing {}", path.display()), e))
    }
}

/// Hash a file's contents with SHA-256, returning lowercase hex
fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_load() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("go");
        fs::write(&exe, b"toolchain").unwrap();

        let manifest = InstallManifest::new("1.22.1", "go.linux-amd64", &exe).unwrap();
        manifest.write(dir.path()).unwrap();

        let loaded = InstallManifest::load(dir.path()).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.entry_point_sha256.len(), 64);
    }

    #[test]
    fn hash_matches_known_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn missing_entry_point_is_copy_failure() {
        let dir = TempDir::new().unwrap();
        let err = InstallManifest::new("1.0", "go.linux-amd64", &dir.path().join("nope"))
            .unwrap_err();
        assert!(matches!(err, LauncherError::CopyFailure { .. }));
    }

    #[test]
    fn load_ignores_garbage() {
        let dir = TempDir::new().unwrap();
        fs::write(InstallManifest::path(dir.path()), "not json").unwrap();
        assert!(InstallManifest::load(dir.path()).is_none());
        assert!(InstallManifest::load(&dir.path().join("missing")).is_none());
    }
}
