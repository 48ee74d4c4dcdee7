//! Staging files for downloads in flight.
//!
//! A download is written to `<target>.part` and only renamed onto the target
//! once it has been verified, so the target path never holds unverified
//! bytes. A rejected download is either removed or moved aside to
//! `<target>.quarantine`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix of the file a download streams into.
pub const STAGING_SUFFIX: &str = ".part";

/// Suffix a rejected download is moved to under the quarantine policy.
pub const QUARANTINE_SUFFIX: &str = ".quarantine";

fn with_suffix(target: &Path, suffix: &str) -> PathBuf {
    let mut s = target.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// `openssl.zip` → `openssl.zip.part`.
pub fn staging_path(target: &Path) -> PathBuf {
    with_suffix(target, STAGING_SUFFIX)
}

/// `openssl.zip` → `openssl.zip.quarantine`.
pub fn quarantine_path(target: &Path) -> PathBuf {
    with_suffix(target, QUARANTINE_SUFFIX)
}

/// Removes `path` if it exists. Returns whether something was removed.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Sequential writer for a staged download.
pub struct StagingFile {
    out: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl StagingFile {
    /// Create (or truncate) the staging file at `path`. The parent directory
    /// is created if missing.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush, fsync and atomically rename onto `final_path` (replacing any
    /// existing file). Both paths must be on the same filesystem.
    pub fn commit(self, final_path: &Path) -> io::Result<()> {
        let path = self.path;
        let file = self.out.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&path, final_path)
    }

    /// Close and delete the staged bytes.
    pub fn discard(self) -> io::Result<()> {
        let path = self.path;
        drop(self.out);
        remove_if_exists(&path).map(|_| ())
    }

    /// Close and move the staged bytes to `to` for later inspection.
    pub fn quarantine(self, to: &Path) -> io::Result<()> {
        let path = self.path;
        let file = self.out.into_inner().map_err(|e| e.into_error())?;
        drop(file);
        fs::rename(&path, to)
    }
}
