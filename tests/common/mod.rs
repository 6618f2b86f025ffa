use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use once_cell::sync::Lazy;
use zeroize::Zeroizing;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;
use gitpass::prompt::PassphrasePrompt;
use gitpass::repository::Repository;

/// The one lifecycle token shared by every test in this binary.
#[allow(dead_code)]
pub static LIFECYCLE: Lazy<Lifecycle> =
    Lazy::new(|| Lifecycle::acquire().expect("failed to acquire lifecycle"));

#[allow(dead_code)]
pub const TEST_PASSPHRASE: &str = "correct horse battery staple";

/// A pre-seeded header with work factor 12 (instead of the production 20)
/// so key derivation stays tractable in tests. The salt decodes to
/// `0123456789abcdef`.
#[allow(dead_code)]
pub const CHEAP_HEADER: &str = r#"{"salt":"MDEyMzQ1Njc4OWFiY2RlZg==","keysize":32,"workfactor":12,"parallelizationfactor":1}"#;

/// Passphrase source that always answers with a canned string.
#[allow(dead_code)]
pub struct StaticPrompt(pub String);

impl PassphrasePrompt for StaticPrompt {
    fn prompt(&self, _message: &str, _confirm: bool) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(self.0.clone()))
    }
}

/// Write the cheap test header into a repository-to-be.
#[allow(dead_code)]
pub fn seed_cheap_header(workdir: &Path) {
    fs::write(workdir.join(".header"), CHEAP_HEADER).expect("failed to seed header");
}

/// Open (or create) a repository that answers passphrase prompts with
/// [`TEST_PASSPHRASE`].
#[allow(dead_code)]
pub fn open_test_repository(path: &Path, create: bool) -> Result<Repository> {
    Repository::open_with_prompt(
        &LIFECYCLE,
        path,
        create,
        Box::new(StaticPrompt(TEST_PASSPHRASE.to_string())),
    )
}

/// Subject lines of the repository's log, newest first.
#[allow(dead_code)]
pub fn git_log_messages(workdir: &Path) -> Vec<String> {
    let output = StdCommand::new("git")
        .args(["log", "--format=%s"])
        .current_dir(workdir)
        .output()
        .expect("failed to run git log");
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Convenience helper for spawning the gitpass binary via assert_cmd.
#[allow(dead_code)]
pub fn gitpass_cmd() -> Command {
    cargo_bin_cmd!("gitpass")
}
