use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;
use gitpass::prompt::{PassphrasePrompt, TerminalPrompt};
use gitpass::repository::Repository;

use super::resolve_repository_path;

/// Read a stored password, or store a new one with `--set` / `--key`.
pub fn pw(
    lifecycle: &Lifecycle,
    repository: Option<&Path>,
    raw_path: &str,
    set: bool,
    key_file: Option<&Path>,
) -> Result<()> {
    let repo_path = resolve_repository_path(repository)?;
    let repo = Repository::open(lifecycle, &repo_path, false)?;
    let path = repo.path(raw_path)?;

    if let Some(key_file) = key_file {
        // The new value comes from a file; useful for binary secrets.
        let mut reader = File::open(key_file)?;
        repo.write_from_stream(&path, &mut reader)?;
        println!("Stored password '{}'.", path);
    } else if set {
        let value = TerminalPrompt.prompt("Password: ", true)?;
        repo.write(&path, value.as_bytes())?;
        println!("Stored password '{}'.", path);
    } else {
        let plaintext = repo.read(&path)?;
        let mut stdout = io::stdout();
        stdout.write_all(&plaintext)?;
        if !plaintext.ends_with(b"\n") {
            writeln!(stdout)?;
        }
    }

    repo.close()
}
