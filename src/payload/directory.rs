//! Directory-backed payload

use super::{create_payload_file, missing_tree, PayloadSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Payload read from an unpacked directory tree
pub struct DirPayload {
    root: PathBuf,
}

impl DirPayload {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl PayloadSource for DirPayload {
    fn copy_tree(&mut self, name: &str, dest: &Path) -> io::Result<u64> {
        let src = self.root.join(name);
        if !src.is_dir() {
            return Err(missing_tree(name, &self.root.display().to_string()));
        }

        fs::create_dir_all(dest)?;
        let copied = copy_dir_recursive(&src, dest)?;
        debug!("Copied {} files from {}", copied, src.display());
        Ok(copied)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Copy `src` into `dst`, following symlinks and keeping permissions
fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut copied = 0;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if fs::metadata(&from)?.is_dir() {
            fs::create_dir_all(&to)?;
            copied += copy_dir_recursive(&from, &to)?;
        } else {
            let mut reader = fs::File::open(&from)?;
            let mut writer = create_payload_file(&to)?;
            io::copy(&mut reader, &mut writer)?;
            fs::set_permissions(&to, reader.metadata()?.permissions())?;
            copied += 1;
        }
    }

    Ok(copied)
}
