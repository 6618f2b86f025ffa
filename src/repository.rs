//! # Repository I/O
//!
//! A [`Repository`] is a handle to one password store: a git working tree
//! whose tracked files are ciphertext entries plus the encryption header.
//! The handle owns the header for the duration of the session and derives
//! the master key fresh for every read and write, prompting for the
//! passphrase through an injected [`PassphrasePrompt`].
//!
//! Every mutation is committed: entry writes commit with the message
//! `Change password '<path>'.` through a guard that fires on every exit
//! path, and the header is re-committed when the handle closes. Commits
//! whose tree is unchanged are suppressed.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::cipher;
use crate::error::{GitPassError, Result};
use crate::git;
use crate::header::{EncryptionHeader, HEADER_RELATIVE_PATH, HEADER_UPDATE_MESSAGE};
use crate::kdf::MasterKey;
use crate::lifecycle::Lifecycle;
use crate::path::EntryPath;
use crate::prompt::{PassphrasePrompt, TerminalPrompt};

const MASTER_PASSPHRASE_PROMPT: &str = "Master passphrase: ";

fn password_change_message(path: &EntryPath) -> String {
    format!("Change password '{}'.", path.relative())
}

/// Scoped owner of an entry's output file and its commit message.
///
/// Once the guard exists the commit happens on every exit path: the normal
/// path goes through [`CommitGuard::finish`], which flushes and closes the
/// file before staging and committing and surfaces every error; if the
/// guard is dropped without `finish` (an error or unwind mid-write), the
/// same flush-and-commit runs best-effort and failures are logged.
struct CommitGuard<'r> {
    repository: &'r git2::Repository,
    relative: String,
    message: String,
    file: Option<File>,
    finished: bool,
}

impl<'r> CommitGuard<'r> {
    fn create(repository: &'r git2::Repository, path: &EntryPath) -> Result<CommitGuard<'r>> {
        let file = File::create(path.absolute())?;
        Ok(CommitGuard {
            repository,
            relative: path.relative().to_string(),
            message: password_change_message(path),
            file: Some(file),
            finished: false,
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)?;
        }
        Ok(())
    }

    fn flush_and_commit(&mut self) -> Result<()> {
        // The commit must observe the final bytes: close the file first.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        git::commit_paths(self.repository, &self.message, &[Path::new(&self.relative)])?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.flush_and_commit()
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.flush_and_commit() {
                warn!(path = %self.relative, error = %e, "commit during unwind failed");
            }
        }
    }
}

/// An open password repository.
pub struct Repository {
    repository: git2::Repository,
    // NOTE: header is Some() everywhere except during close/drop.
    header: Option<EncryptionHeader>,
    prompt: Box<dyn PassphrasePrompt>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.repository.path())
            .field("header", &self.header)
            .finish()
    }
}

impl Repository {
    /// Open the repository at (or above) `path`, prompting for passphrases
    /// on the terminal. With `create` set, a missing repository is
    /// initialized along with a fresh encryption header.
    pub fn open<P: AsRef<Path>>(
        lifecycle: &Lifecycle,
        path: P,
        create: bool,
    ) -> Result<Repository> {
        Self::open_with_prompt(lifecycle, path, create, Box::new(TerminalPrompt))
    }

    /// Like [`Repository::open`], with an explicit passphrase source.
    pub fn open_with_prompt<P: AsRef<Path>>(
        _lifecycle: &Lifecycle,
        path: P,
        create: bool,
        prompt: Box<dyn PassphrasePrompt>,
    ) -> Result<Repository> {
        let repository = git::open_or_init(path.as_ref(), create)?;
        let workdir = git::workdir(&repository)?.to_path_buf();

        let header = EncryptionHeader::open(&workdir)?;
        // A freshly defaulted header is written out immediately so the salt
        // is durable before the first entry is encrypted under it; it is
        // committed when the handle closes.
        if !EncryptionHeader::path_in(&workdir).exists() {
            header.write_to(&workdir)?;
        }
        debug!(workdir = %workdir.display(), "opened repository");

        Ok(Repository {
            repository,
            header: Some(header),
            prompt,
        })
    }

    pub fn workdir(&self) -> Result<&Path> {
        git::workdir(&self.repository)
    }

    /// Validate and normalize `raw` against this repository's working tree.
    pub fn path(&self, raw: &str) -> Result<EntryPath> {
        EntryPath::new(self.workdir()?, raw)
    }

    pub fn header(&self) -> &EncryptionHeader {
        self.header
            .as_ref()
            .expect("header is present outside close/drop")
    }

    /// Prompt for the passphrase and derive this repository's master key.
    ///
    /// The on-disk header is re-read first; observing a salt different from
    /// the one cached at open is fatal, because a changed salt silently
    /// invalidates every stored entry.
    pub fn build_master_key(&self) -> Result<MasterKey> {
        let header = self.header();

        let on_disk = EncryptionHeader::open(self.workdir()?)?;
        if on_disk.salt() != header.salt() {
            return Err(GitPassError::SaltChanged);
        }

        let passphrase = self.prompt.prompt(MASTER_PASSPHRASE_PROMPT, false)?;
        let key = MasterKey::derive(
            passphrase.as_bytes(),
            header.salt(),
            header.key_size(),
            header.work_factor(),
            header.parallelization_factor(),
        )?;
        Ok(key)
    }

    /// Decrypt and return the entry at `path`.
    pub fn read(&self, path: &EntryPath) -> Result<Zeroizing<Vec<u8>>> {
        if path.is_empty() {
            return Err(GitPassError::InvalidPath(path.relative().to_string()));
        }
        if !path.absolute().exists() {
            return Err(GitPassError::NotFound(path.relative().to_string()));
        }

        let ciphertext = fs::read(path.absolute())?;
        let key = self.build_master_key()?;
        let plaintext = cipher::decrypt(&key, &ciphertext)?;
        Ok(Zeroizing::new(plaintext))
    }

    /// Encrypt `plaintext` into the entry at `path` and commit the change.
    ///
    /// Parent directories are created as needed. Once the output file has
    /// been opened, the commit fires on every exit path; a failure before
    /// that point leaves the repository untouched and commits nothing.
    pub fn write(&self, path: &EntryPath, plaintext: &[u8]) -> Result<()> {
        if path.is_empty() {
            return Err(GitPassError::InvalidPath(path.relative().to_string()));
        }

        let key = self.build_master_key()?;
        let ciphertext = cipher::encrypt(&key, plaintext)?;

        if let Some(parent) = path.absolute().parent() {
            fs::create_dir_all(parent)?;
        }

        let mut guard = CommitGuard::create(&self.repository, path)?;
        guard.write_all(&ciphertext)?;
        guard.finish()?;
        debug!(path = %path.relative(), "stored entry");
        Ok(())
    }

    /// Like [`Repository::write`], drawing the plaintext from a reader.
    pub fn write_from_stream<R: Read>(&self, path: &EntryPath, reader: &mut R) -> Result<()> {
        let mut plaintext = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut plaintext)?;
        self.write(path, &plaintext)
    }

    /// Delete the entry at `path` and commit the removal. The ciphertext
    /// remains reachable through history; removal only affects the current
    /// tree.
    pub fn remove(&self, path: &EntryPath) -> Result<()> {
        if path.is_empty() {
            return Err(GitPassError::InvalidPath(path.relative().to_string()));
        }
        if !path.absolute().exists() {
            return Err(GitPassError::NotFound(path.relative().to_string()));
        }

        fs::remove_file(path.absolute())?;
        git::commit_paths(
            &self.repository,
            &format!("Remove password '{}'.", path.relative()),
            &[Path::new(path.relative())],
        )?;
        debug!(path = %path.relative(), "removed entry");
        Ok(())
    }

    /// Visit every committed entry whose relative path starts with
    /// `prefix`, excluding the encryption header. The visitor returns
    /// `false` to stop the walk early.
    ///
    /// The match is a literal byte prefix, not a path-segment prefix:
    /// listing under `foo` yields both `foo/bar` and `foobar`. Listing
    /// reflects the most recent commit; entries written by a handle that
    /// has not committed yet (and untracked files generally) do not appear.
    /// Order follows git's tree traversal and is not guaranteed.
    pub fn list<F>(&self, prefix: &EntryPath, mut visitor: F) -> Result<()>
    where
        F: FnMut(&str) -> bool,
    {
        let tree = match git::head_tree(&self.repository)? {
            Some(tree) => tree,
            None => return Ok(()),
        };

        git::walk_blobs(&tree, |path| {
            if path == HEADER_RELATIVE_PATH {
                return true;
            }
            if !path.starts_with(prefix.relative()) {
                return true;
            }
            visitor(path)
        })
    }

    fn flush_header(&mut self) -> Result<()> {
        let header = match self.header.take() {
            Some(header) => header,
            None => return Ok(()),
        };
        let workdir = git::workdir(&self.repository)?.to_path_buf();
        header.write_to(&workdir)?;
        git::commit_paths(
            &self.repository,
            HEADER_UPDATE_MESSAGE,
            &[Path::new(HEADER_RELATIVE_PATH)],
        )?;
        Ok(())
    }

    /// Close the handle, persisting and committing the encryption header.
    ///
    /// Dropping the handle performs the same flush but only logs failures;
    /// `close` is for callers who want them surfaced.
    pub fn close(mut self) -> Result<()> {
        self.flush_header()
    }
}

impl Drop for Repository {
    fn drop(&mut self) {
        if let Err(e) = self.flush_header() {
            warn!(error = %e, "flushing encryption header on shutdown failed");
        }
    }
}
