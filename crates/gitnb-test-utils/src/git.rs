//! Git repository fixtures.

use std::path::{Path, PathBuf};

/// Initialises a real git repository using `git2` (no initial commit, no config).
///
/// Use for: tests that check what ends up in the index.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Paths currently in the index of the repository at `path`, sorted.
///
/// # Panics
/// Panics if the repository or its index cannot be opened.
pub fn staged_paths(path: &Path) -> Vec<PathBuf> {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("staged_paths: failed to open {}: {e}", path.display()));
    let index = repo
        .index()
        .unwrap_or_else(|e| panic!("staged_paths: failed to read index: {e}"));
    let mut paths: Vec<PathBuf> = index
        .iter()
        .map(|entry| PathBuf::from(String::from_utf8_lossy(&entry.path).into_owned()))
        .collect();
    paths.sort();
    paths
}
