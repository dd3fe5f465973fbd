//! Zip-backed payload
//!
//! A plain zip file is read as a whole. A launcher bundle is read through
//! its trailer, which bounds the archive inside the executable.

use super::bundle::{find_archive, Section};
use super::{create_payload_file, missing_tree, PayloadSource};
use crate::error::{LauncherError, LauncherResult};
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Payload read from a zip archive
pub struct ZipPayload<R> {
    archive: ZipArchive<R>,
    origin: String,
}

impl ZipPayload<Section<File>> {
    /// Open the archive at `path`, either a zip file or a bundle
    pub fn open(path: &Path) -> LauncherResult<Self> {
        Self::open_section(path, false)
    }

    /// Open the payload appended to the launcher bundle at `path`
    pub fn open_bundle(path: &Path) -> LauncherResult<Self> {
        Self::open_section(path, true)
    }

    fn open_section(path: &Path, bundle_only: bool) -> LauncherResult<Self> {
        let reading = |e: io::Error| {
            LauncherError::copy(format!("reading payload archive {}", path.display()), e)
        };

        let mut file = File::open(path)
            .map_err(|e| LauncherError::copy(format!("opening payload {}", path.display()), e))?;
        let range = match find_archive(&mut file).map_err(reading)? {
            Some(range) => range,
            None if bundle_only => {
                return Err(reading(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no payload is appended to this launcher",
                )))
            }
            None => 0..file.metadata().map_err(reading)?.len(),
        };
        debug!("Payload archive at bytes {:?} of {}", range, path.display());

        let section = Section::new(file, range).map_err(reading)?;
        Self::from_reader(section, path.display().to_string()).map_err(reading)
    }
}

impl<R: Read + Seek> ZipPayload<R> {
    /// Read an archive from any seekable source
    pub fn from_reader(reader: R, origin: impl Into<String>) -> io::Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self {
            archive,
            origin: origin.into(),
        })
    }
}

impl<R: Read + Seek> PayloadSource for ZipPayload<R> {
    fn copy_tree(&mut self, name: &str, dest: &Path) -> io::Result<u64> {
        let prefix = format!("{name}/");
        let mut found = false;
        let mut copied = 0;

        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i)?;
            let entry_name = entry.name().to_string();
            if !entry_name.starts_with(&prefix) {
                continue;
            }
            found = true;

            let relative = entry
                .enclosed_name()
                .and_then(|p| p.strip_prefix(name).ok().map(PathBuf::from))
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("unsafe path in payload archive: {entry_name}"),
                    )
                })?;
            if relative.as_os_str().is_empty() {
                continue;
            }

            if entry.unix_mode().is_some_and(is_symlink_mode) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("symbolic link in payload archive: {entry_name}"),
                ));
            }

            let target = dest.join(&relative);
            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }

            let mut out = create_payload_file(&target)?;
            io::copy(&mut entry, &mut out)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o7777))?;
                }
            }

            copied += 1;
        }

        if !found {
            return Err(missing_tree(name, &self.origin));
        }

        debug!("Copied {} files from {}:{}", copied, self.origin, name);
        Ok(copied)
    }

    fn describe(&self) -> String {
        format!("zip archive {}", self.origin)
    }
}

fn is_symlink_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o120000
}
