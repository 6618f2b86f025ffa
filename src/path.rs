//! # Entry Paths
//!
//! A stored password is addressed by a slash-separated logical path,
//! relative to the repository's working tree. Paths are restricted to ASCII
//! letters, digits, and separators; backslashes are accepted as separators
//! and normalized to forward slashes.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GitPassError, Result};

/// A validated, normalized entry path: the relative form used for listing
/// and commit messages, plus the resolved absolute form used for file I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPath {
    relative: String,
    absolute: PathBuf,
}

fn is_valid(raw: &str) -> bool {
    raw.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '\\')
}

/// Normalize a raw entry path: backslashes become forward slashes, leading
/// and trailing separators are stripped, and separator runs collapse to a
/// single slash. Normalization is idempotent.
pub fn normalize(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

impl EntryPath {
    /// Validate and normalize `raw`, resolving it against `workdir`.
    ///
    /// An empty normalized path is representable (it addresses the whole
    /// tree when listing); read and write operations reject it separately.
    pub fn new(workdir: &Path, raw: &str) -> Result<EntryPath> {
        if !is_valid(raw) {
            return Err(GitPassError::InvalidPath(raw.to_string()));
        }

        let relative = normalize(raw);
        let absolute = workdir.join(&relative);
        Ok(EntryPath { relative, absolute })
    }

    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn is_empty(&self) -> bool {
        self.relative.is_empty()
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative)
    }
}
