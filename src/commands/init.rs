use std::path::Path;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;
use gitpass::repository::Repository;

use super::resolve_repository_path;

/// Initialize a password repository (creating it if necessary).
pub fn init(lifecycle: &Lifecycle, repository: Option<&Path>) -> Result<()> {
    let path = resolve_repository_path(repository)?;
    let repo = Repository::open(lifecycle, &path, true)?;
    println!("Initialized repository: {}", repo.workdir()?.display());
    repo.close()
}
