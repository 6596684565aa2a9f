//! [`TestRepo`] builder for checkout and clone scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository};
use tempfile::TempDir;

use crate::git;

/// A repository in a temporary directory, on branch `main`.
///
/// # Example
///
/// ```rust,no_run
/// use repo_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.commit(&[("a.txt", "one")], "Initial commit");
/// repo.write("a.txt", "local edit");
/// repo.assert_file_contains("a.txt", "local edit");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
    repo: Repository,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty repository with an unborn `main` branch.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = git::init_repo(temp_dir.path());
        Self { temp_dir, repo }
    }

    /// Return the working tree root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root as a string, usable as a local clone URL.
    pub fn url(&self) -> String {
        self.root().to_string_lossy().into_owned()
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Write, stage and commit `files` on HEAD.
    pub fn commit(&self, files: &[(&str, &str)], message: &str) -> Oid {
        git::commit_files(&self.repo, files, message)
    }

    /// Commit an executable file on HEAD.
    #[cfg(unix)]
    pub fn commit_executable(&self, name: &str, content: &str, message: &str) -> Oid {
        git::commit_executable(&self.repo, name, content, message)
    }

    /// Move the current branch to `oid`, leaving index and working tree alone.
    pub fn move_head(&self, oid: Oid) {
        git::move_head(&self.repo, oid);
    }

    pub fn branch(&self, name: &str, oid: Oid) {
        git::create_branch(&self.repo, name, oid);
    }

    /// Write a working tree file without staging it.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Delete a working tree file without staging the deletion.
    pub fn remove(&self, path: &str) {
        fs::remove_file(self.path(path)).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        let full_path = self.path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
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
