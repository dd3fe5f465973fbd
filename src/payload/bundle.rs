//! Launcher bundles: an executable with a zip payload appended
//!
//! ```text
//! [ launcher executable ][ payload zip ][ offset: u64 LE ][ b"GOAPEZIP" ]
//! ```
//!
//! The trailer records where the archive starts, so the archive is opened
//! on exactly its own bytes. The executable in front of it contains zip
//! signatures of its own (it links a zip reader) and would otherwise
//! confuse the search for the end of central directory.

use super::PAYLOAD_ENTRIES;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Marks the last bytes of a bundle
pub const TRAILER_MAGIC: &[u8; 8] = b"GOAPEZIP";

/// Archive offset plus magic
pub const TRAILER_LEN: u64 = 16;

/// Locate the payload archive in a bundle.
///
/// Returns `None` when the trailer is absent.
pub fn find_archive<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Range<u64>>> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < TRAILER_LEN {
        return Ok(None);
    }

    let mut trailer = [0u8; TRAILER_LEN as usize];
    reader.seek(SeekFrom::Start(len - TRAILER_LEN))?;
    reader.read_exact(&mut trailer)?;
    if &trailer[8..] != TRAILER_MAGIC {
        return Ok(None);
    }

    let mut offset = [0u8; 8];
    offset.copy_from_slice(&trailer[..8]);
    let start = u64::from_le_bytes(offset);
    let end = len - TRAILER_LEN;
    if start > end {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bundle trailer points past the end of the file ({start} > {end})"),
        ));
    }
    Ok(Some(start..end))
}

/// Write `launcher` followed by `archive` and the trailer to `output`.
///
/// The archive must provide every top-level payload tree. Returns the
/// offset of the archive inside the bundle.
pub fn write_bundle(launcher: &Path, archive: &Path, output: &Path) -> io::Result<u64> {
    check_archive(&mut File::open(archive)?)?;

    let mut out = File::create(output)?;
    let offset = io::copy(&mut File::open(launcher)?, &mut out)?;
    let archive_len = io::copy(&mut File::open(archive)?, &mut out)?;
    out.write_all(&offset.to_le_bytes())?;
    out.write_all(TRAILER_MAGIC)?;
    out.sync_all()?;
    drop(out);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(output, fs::Permissions::from_mode(0o755))?;
    }

    debug!(
        "Bundled {} ({} bytes) at offset {} into {}",
        archive.display(),
        archive_len,
        offset,
        output.display()
    );
    Ok(offset)
}

/// Reject archives missing one of the payload trees.
fn check_archive<R: Read + Seek>(reader: &mut R) -> io::Result<()> {
    let archive = ZipArchive::new(reader)?;
    let present: BTreeSet<&str> = archive
        .file_names()
        .filter_map(|name| name.split('/').next())
        .collect();

    let missing: Vec<&str> = PAYLOAD_ENTRIES
        .iter()
        .copied()
        .filter(|entry| !present.contains(entry))
        .collect();
    if !missing.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("payload archive is missing {}", missing.join(", ")),
        ));
    }
    Ok(())
}

/// A window onto `range` of an underlying reader
pub struct Section<R> {
    inner: R,
    start: u64,
    len: u64,
    pos: u64,
}

impl<R: Read + Seek> Section<R> {
    pub fn new(mut inner: R, range: Range<u64>) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(range.start))?;
        Ok(Self {
            inner,
            start: range.start,
            len: range.end.saturating_sub(range.start),
            pos: 0,
        })
    }
}

impl<R: Read + Seek> Read for Section<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.len.saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }
        let limit = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..limit])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for Section<R> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let target = match from {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        }
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of payload")
        })?;

        self.inner.seek(SeekFrom::Start(self.start + target))?;
        self.pos = target;
        Ok(target)
    }
}
