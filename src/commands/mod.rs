pub mod config;
pub mod generate;
pub mod init;
pub mod ls;
pub mod pw;
pub mod rm;

pub use config::config;
pub use generate::generate;
pub use init::init;
pub use ls::ls;
pub use pw::pw;
pub use rm::rm;

use std::path::{Path, PathBuf};

use gitpass::config::ConfigStore;
use gitpass::error::{GitPassError, Result};

/// The repository to operate on: the explicit `--repository` option if
/// given, otherwise the configured `default_repository`.
fn resolve_repository_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let store = ConfigStore::open()?;
    if let Some(path) = store.default_repository() {
        return Ok(path.to_path_buf());
    }

    Err(GitPassError::Other(
        "No repository path specified. Pass --repository, or set the \
         'default_repository' configuration key."
            .to_string(),
    ))
}
