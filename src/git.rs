//! # Git Plumbing
//!
//! The version-control backend for a password repository. The rest of the
//! crate needs only a narrow contract from git: discover or initialize a
//! repository, stage a set of relative paths, create a commit (skipping
//! empty ones), and walk the most recently committed tree.

use std::path::Path;

use git2::{
    Commit, ErrorCode, ObjectType, Oid, Repository, Signature, Tree, TreeWalkMode, TreeWalkResult,
};
use tracing::debug;

use crate::error::{GitPassError, Result};

const FALLBACK_SIGNATURE_NAME: &str = "gitpass";
const FALLBACK_SIGNATURE_EMAIL: &str = "gitpass@localhost";

/// Open the repository containing `path`, searching upwards the way git
/// itself does. With `create` set, a missing repository is initialized at
/// exactly `path` instead.
pub fn open_or_init(path: &Path, create: bool) -> Result<Repository> {
    match Repository::discover(path) {
        Ok(repository) => Ok(repository),
        Err(e) if e.code() == ErrorCode::NotFound => {
            if create {
                debug!(path = %path.display(), "initializing fresh repository");
                Ok(Repository::init(path)?)
            } else {
                Err(GitPassError::NotARepository(path.to_path_buf()))
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// The repository's working directory. Bare repositories cannot hold a
/// password store.
pub fn workdir(repository: &Repository) -> Result<&Path> {
    repository
        .workdir()
        .ok_or_else(|| GitPassError::Other("Repository has no working directory".to_string()))
}

fn commit_signature(repository: &Repository) -> Result<Signature<'static>> {
    match repository.signature() {
        Ok(signature) => Ok(signature),
        Err(_) => Ok(Signature::now(
            FALLBACK_SIGNATURE_NAME,
            FALLBACK_SIGNATURE_EMAIL,
        )?),
    }
}

fn head_commit(repository: &Repository) -> Result<Option<Commit>> {
    match repository.head() {
        Ok(reference) => {
            let object = reference.resolve()?.peel(ObjectType::Commit)?;
            let commit = object
                .into_commit()
                .map_err(|_| git2::Error::from_str("resolving HEAD commit failed"))?;
            Ok(Some(commit))
        }
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// The tree of the most recent commit, or `None` when nothing has been
/// committed yet.
pub fn head_tree(repository: &Repository) -> Result<Option<Tree>> {
    match head_commit(repository)? {
        Some(commit) => Ok(Some(commit.tree()?)),
        None => Ok(None),
    }
}

/// Stage the given workdir-relative paths (adding present files, removing
/// deleted ones) and commit the resulting tree to HEAD.
///
/// No commit object is created when the staged tree is identical to HEAD's
/// tree; the unchanged tree id is returned instead.
pub fn commit_paths(repository: &Repository, message: &str, paths: &[&Path]) -> Result<Oid> {
    let mut index = repository.index()?;
    let workdir = workdir(repository)?.to_path_buf();

    for path in paths {
        if workdir.join(path).exists() {
            index.add_path(path)?;
        } else if index.get_path(path, 0).is_some() {
            index.remove_path(path)?;
        }
    }

    // Persist the index before writing it out as a tree; otherwise a newly
    // added file shows up as deleted-plus-untracked afterwards.
    index.write()?;
    let tree_oid = index.write_tree()?;
    let tree = repository.find_tree(tree_oid)?;

    let parent = head_commit(repository)?;
    let unchanged = match &parent {
        Some(commit) => commit.tree_id() == tree_oid,
        None => tree.iter().next().is_none(),
    };
    if unchanged {
        debug!(message, "skipping empty commit");
        return Ok(tree_oid);
    }

    let signature = commit_signature(repository)?;
    let parents: Vec<&Commit> = parent.iter().collect();
    let oid = repository.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        parents.as_slice(),
    )?;
    debug!(message, %oid, "created commit");
    Ok(oid)
}

/// Invoke `visitor` with the full relative path of every blob-like entry in
/// `tree` (files and symlinks; subtrees are traversed, submodules skipped).
/// The walk stops early when the visitor returns `false`.
pub fn walk_blobs<F>(tree: &Tree, mut visitor: F) -> Result<()>
where
    F: FnMut(&str) -> bool,
{
    let walk = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() != Some(ObjectType::Blob) {
            return TreeWalkResult::Ok;
        }
        let name = match entry.name() {
            Some(name) => name,
            None => return TreeWalkResult::Ok,
        };
        let path = format!("{}{}", root, name);
        if visitor(&path) {
            TreeWalkResult::Ok
        } else {
            TreeWalkResult::Abort
        }
    });

    match walk {
        Ok(()) => Ok(()),
        // Abort from the visitor surfaces as a user error; that is the
        // early-stop case, not a failure.
        Err(e) if e.code() == ErrorCode::User => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(temp: &TempDir) -> Repository {
        open_or_init(temp.path(), true).unwrap()
    }

    #[test]
    fn test_open_missing_without_create_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent");
        assert!(matches!(
            open_or_init(&path, false),
            Err(GitPassError::NotARepository(_))
        ));
    }

    #[test]
    fn test_open_or_init_creates_and_rediscovers() {
        let temp = TempDir::new().unwrap();
        let repository = init_repo(&temp);
        assert_eq!(
            workdir(&repository).unwrap().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );

        // A subdirectory discovers the same repository.
        let subdir = temp.path().join("a/b");
        fs::create_dir_all(&subdir).unwrap();
        let rediscovered = open_or_init(&subdir, false).unwrap();
        assert_eq!(
            workdir(&rediscovered).unwrap().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_commit_paths_creates_one_commit() {
        let temp = TempDir::new().unwrap();
        let repository = init_repo(&temp);

        fs::write(temp.path().join("entry"), b"contents").unwrap();
        commit_paths(&repository, "Add entry.", &[Path::new("entry")]).unwrap();

        let commit = head_commit(&repository).unwrap().unwrap();
        assert_eq!(commit.message().unwrap(), "Add entry.");
        assert_eq!(commit.parent_count(), 0);
    }

    #[test]
    fn test_unchanged_tree_skips_commit() {
        let temp = TempDir::new().unwrap();
        let repository = init_repo(&temp);

        fs::write(temp.path().join("entry"), b"contents").unwrap();
        commit_paths(&repository, "Add entry.", &[Path::new("entry")]).unwrap();
        let first = head_commit(&repository).unwrap().unwrap().id();

        // Same bytes staged again: no new commit object.
        commit_paths(&repository, "Add entry again.", &[Path::new("entry")]).unwrap();
        assert_eq!(head_commit(&repository).unwrap().unwrap().id(), first);
    }

    #[test]
    fn test_head_tree_empty_before_first_commit() {
        let temp = TempDir::new().unwrap();
        let repository = init_repo(&temp);
        assert!(head_tree(&repository).unwrap().is_none());
    }

    #[test]
    fn test_walk_blobs_recurses_and_aborts() {
        let temp = TempDir::new().unwrap();
        let repository = init_repo(&temp);

        fs::create_dir_all(temp.path().join("dir")).unwrap();
        fs::write(temp.path().join("dir/inner"), b"a").unwrap();
        fs::write(temp.path().join("outer"), b"b").unwrap();
        commit_paths(
            &repository,
            "Add files.",
            &[Path::new("dir/inner"), Path::new("outer")],
        )
        .unwrap();

        let tree = head_tree(&repository).unwrap().unwrap();
        let mut seen = Vec::new();
        walk_blobs(&tree, |path| {
            seen.push(path.to_string());
            true
        })
        .unwrap();
        seen.sort();
        assert_eq!(seen, vec!["dir/inner".to_string(), "outer".to_string()]);

        // Early stop after the first entry.
        let mut count = 0;
        walk_blobs(&tree, |_| {
            count += 1;
            false
        })
        .unwrap();
        assert_eq!(count, 1);
    }
}
