use std::path::Path;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;
use gitpass::repository::Repository;

use super::resolve_repository_path;

/// List stored entries under a path prefix.
pub fn ls(lifecycle: &Lifecycle, repository: Option<&Path>, path: &str) -> Result<()> {
    let repo_path = resolve_repository_path(repository)?;
    let repo = Repository::open(lifecycle, &repo_path, false)?;

    let prefix = repo.path(path)?;
    repo.list(&prefix, |entry| {
        println!("{}", entry);
        true
    })?;

    repo.close()
}
