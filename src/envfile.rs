//! Append-only access to a line-oriented `.env` file.

use crate::{DevUrlsError, Result};
use devurls_core::{DerivedUrl, Detection};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A `.env` file that devurls reads and appends to, but never rewrites.
///
/// Each operation opens the file, does its work and drops the handle before
/// returning, so a read and a following append never overlap.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty file if nothing exists at the path yet.
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                debug!(path = %self.path.display(), "created empty env file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(DevUrlsError::from_io(e, &self.path)),
        }
    }

    /// Read every line of the file.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| DevUrlsError::from_io(e, &self.path))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| DevUrlsError::from_io(e, &self.path))?;
        debug!(path = %self.path.display(), lines = lines.len(), "read env file");
        Ok(lines)
    }

    /// Whether any line contains `needle`, wherever it appears in the line.
    ///
    /// This matches commented-out entries and values that merely mention the
    /// key, which is the long-standing behaviour of the updater.
    pub fn contains_substring(&self, needle: &str) -> Result<bool> {
        Ok(self
            .read_lines()?
            .iter()
            .any(|line| line.contains(needle)))
    }

    /// The set of keys defined by parsed `KEY=VALUE` entries.
    pub fn keys(&self) -> Result<HashSet<String>> {
        // Surface a missing file as FileNotFound rather than a dotenv error
        fs::metadata(&self.path).map_err(|e| DevUrlsError::from_io(e, &self.path))?;

        let mut keys = HashSet::new();
        for item in dotenvy::from_path_iter(&self.path)? {
            let (key, _) = item?;
            keys.insert(key);
        }
        Ok(keys)
    }

    /// Whether the file already records `key` according to `detection`.
    pub fn contains(&self, detection: Detection, key: &str) -> Result<bool> {
        match detection {
            Detection::Substring => self.contains_substring(key),
            Detection::Key => Ok(self.keys()?.contains(key)),
        }
    }

    /// Append one `KEY=VALUE` line per URL, each preceded by a newline.
    ///
    /// Existing content is left untouched, including a missing trailing newline.
    pub fn append(&self, urls: &[DerivedUrl]) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| DevUrlsError::from_io(e, &self.path))?;

        let mut content = String::new();
        for url in urls {
            content.push('\n');
            content.push_str(&url.entry());
        }
        file.write_all(content.as_bytes())
            .map_err(|e| DevUrlsError::from_io(e, &self.path))?;

        debug!(path = %self.path.display(), entries = urls.len(), "appended to env file");
        Ok(())
    }
}
