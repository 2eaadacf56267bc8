//! [`TestProject`] scratch directory for gitnb scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;
use crate::notebook::three_cell_notebook;

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use gitnb_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_three_cell_notebook("notebooks/a.ipynb");
/// project.assert_file_exists("notebooks/a.ipynb");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a temporary directory that is also a git repository.
    pub fn with_git() -> Self {
        let project = Self::new();
        git::real_git_repo(project.root());
        project
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a project-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestProject::write: {}: {e}", path.display()));
    }

    /// Write the standard three-cell notebook at `relative`.
    pub fn write_three_cell_notebook(&self, relative: &str) {
        self.write(relative, &three_cell_notebook());
    }

    /// Read a file as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestProject::read: {}: {e}", path.display()))
    }

    /// Assert that `path` (relative to the project root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
