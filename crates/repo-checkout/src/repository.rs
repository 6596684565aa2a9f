//! Owned handle to an opened or cloned repository

use std::path::Path;

use git2::Repository;

use crate::Result;

/// An open repository.
///
/// The handle is exclusively owned by whoever opened or cloned it. It is
/// `Send` but not `Sync`: mutating calls on one handle must be serialized by
/// the caller.
pub struct RepositoryHandle {
    repo: Repository,
}

impl RepositoryHandle {
    /// Open the repository at `path` (working tree or git directory).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Opened repository");
        Ok(Self { repo })
    }

    /// Path to the repository's git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Working tree root, or `None` for a bare repository.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Load the repository index.
    pub fn index(&self) -> Result<git2::Index> {
        Ok(self.repo.index()?)
    }

    /// Short name of the branch HEAD points at, or `None` when detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;

        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    /// Borrow the underlying engine repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn into_repository(self) -> Repository {
        self.repo
    }
}

impl From<Repository> for RepositoryHandle {
    fn from(repo: Repository) -> Self {
        Self { repo }
    }
}

impl std::fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("git_dir", &self.repo.path())
            .field("workdir", &self.repo.workdir())
            .finish()
    }
}
