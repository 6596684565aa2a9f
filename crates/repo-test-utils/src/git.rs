//! Fixture functions that build real repository history with `git2`.
//!
//! No `git` binary and no user configuration are needed: commits use a fixed
//! signature.

use std::fs;
use std::path::Path;

use git2::{Commit, Oid, Repository, RepositoryInitOptions, Signature};

/// Branch every fixture repository starts on.
pub const DEFAULT_BRANCH: &str = "main";

/// Signature used for all fixture commits.
pub fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@test.com")
        .unwrap_or_else(|e| panic!("signature: failed to build signature: {e}"))
}

/// Initialise a repository at `path` whose unborn HEAD points at `main`.
///
/// # Panics
/// Panics if the repository cannot be created.
pub fn init_repo(path: &Path) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(DEFAULT_BRANCH);
    Repository::init_opts(path, &opts).unwrap_or_else(|e| {
        panic!("init_repo: failed to init repository at {}: {e}", path.display())
    })
}

/// Write `files` into the working tree, stage them and commit on HEAD.
///
/// Parent directories are created as needed. Returns the new commit id.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    let workdir = repo
        .workdir()
        .unwrap_or_else(|| panic!("commit_files: repository is bare"));

    for (name, content) in files {
        write_file(&workdir.join(name), content);
    }

    let names: Vec<&str> = files.iter().map(|(name, _)| *name).collect();
    stage_and_commit(repo, &names, message)
}

/// Commit a single file with the executable bit set.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
#[cfg(unix)]
pub fn commit_executable(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    use std::os::unix::fs::PermissionsExt;

    let workdir = repo
        .workdir()
        .unwrap_or_else(|| panic!("commit_executable: repository is bare"));
    let path = workdir.join(name);
    write_file(&path, content);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("commit_executable: failed to chmod {name}: {e}"));

    stage_and_commit(repo, &[name], message)
}

/// Point the current branch at `oid` without touching the index or the
/// working tree.
///
/// # Panics
/// Panics if HEAD cannot be resolved or updated.
pub fn move_head(repo: &Repository, oid: Oid) {
    let mut head = repo
        .head()
        .unwrap_or_else(|e| panic!("move_head: failed to resolve HEAD: {e}"));
    head.set_target(oid, "test: move HEAD")
        .unwrap_or_else(|e| panic!("move_head: failed to move HEAD to {oid}: {e}"));
}

/// Create branch `name` at `oid`.
///
/// # Panics
/// Panics if the commit is missing or the branch exists.
pub fn create_branch(repo: &Repository, name: &str, oid: Oid) {
    let commit = repo
        .find_commit(oid)
        .unwrap_or_else(|e| panic!("create_branch: commit {oid} not found: {e}"));
    repo.branch(name, &commit, false)
        .unwrap_or_else(|e| panic!("create_branch: failed to create {name}: {e}"));
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(path, content)
        .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", path.display()));
}

fn stage_and_commit(repo: &Repository, names: &[&str], message: &str) -> Oid {
    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("stage_and_commit: failed to load index: {e}"));
    for name in names {
        index
            .add_path(Path::new(name))
            .unwrap_or_else(|e| panic!("stage_and_commit: failed to stage {name}: {e}"));
    }
    index
        .write()
        .unwrap_or_else(|e| panic!("stage_and_commit: failed to write index: {e}"));

    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("stage_and_commit: failed to write tree: {e}"));
    let tree = repo
        .find_tree(tree_id)
        .unwrap_or_else(|e| panic!("stage_and_commit: tree {tree_id} missing: {e}"));

    let parents: Vec<Commit<'_>> = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok())
        .into_iter()
        .collect();
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    let sig = signature();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap_or_else(|e| panic!("stage_and_commit: failed to commit: {e}"))
}
