use std::path::Path;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;
use gitpass::repository::Repository;

use super::resolve_repository_path;

/// Remove a stored entry.
pub fn rm(lifecycle: &Lifecycle, repository: Option<&Path>, raw_path: &str) -> Result<()> {
    let repo_path = resolve_repository_path(repository)?;
    let repo = Repository::open(lifecycle, &repo_path, false)?;

    let path = repo.path(raw_path)?;
    repo.remove(&path)?;
    println!("Removed password '{}'.", path);

    repo.close()
}
