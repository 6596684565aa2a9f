//! Tests for checking out HEAD under each strategy

use std::fs;
use std::path::{Path, PathBuf};

use git2::{ObjectType, Oid};
use repo_checkout::{CheckoutError, CheckoutOptions, RepositoryHandle, StrategyFlags};
use repo_test_utils::repo::TestRepo;
use rstest::rstest;

fn setup_committed_repo() -> (TestRepo, RepositoryHandle) {
    let repo = TestRepo::new();
    repo.commit(
        &[("a.txt", "one"), ("b.md", "bee"), (".gitignore", "*.log\n")],
        "Initial commit",
    );
    let handle = RepositoryHandle::open(repo.root()).unwrap();
    (repo, handle)
}

fn opts(flags: StrategyFlags) -> CheckoutOptions {
    CheckoutOptions::with_strategy(flags)
}

fn index_blob(repo: &TestRepo, path: &str) -> Oid {
    let index = RepositoryHandle::open(repo.root()).unwrap().index().unwrap();
    index.get_path(Path::new(path), 0).unwrap().id
}

fn blob_id(content: &str) -> Oid {
    Oid::hash_object(ObjectType::Blob, content.as_bytes()).unwrap()
}

// ============================================================================
// Base strategies
// ============================================================================

#[test]
fn test_safe_refuses_modified_tracked_file() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local edit");

    let err = handle.checkout(Some(&opts(StrategyFlags::SAFE))).unwrap_err();

    assert!(matches!(err, CheckoutError::Conflict { .. }), "got {err:?}");
    assert_eq!(err.first_conflict(), Some(&PathBuf::from("a.txt")));
    assert!(err.engine().unwrap().is_conflict());
    assert_eq!(repo.read("a.txt"), "local edit");
}

#[test]
fn test_force_overwrites_modified_tracked_file() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local edit");

    handle.checkout(Some(&opts(StrategyFlags::FORCE))).unwrap();

    assert_eq!(repo.read("a.txt"), "one");
}

#[test]
fn test_safe_on_clean_tree_succeeds() {
    let (repo, handle) = setup_committed_repo();

    handle.checkout(Some(&opts(StrategyFlags::SAFE))).unwrap();

    assert_eq!(repo.read("a.txt"), "one");
    assert_eq!(repo.read("b.md"), "bee");
}

#[test]
fn test_absent_options_are_a_dry_run() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local edit");
    repo.remove("b.md");

    handle.checkout(None).unwrap();

    assert_eq!(repo.read("a.txt"), "local edit");
    repo.assert_file_not_exists("b.md");
}

#[test]
fn test_safe_does_not_recreate_missing_file() {
    let (repo, handle) = setup_committed_repo();
    repo.remove("b.md");

    handle.checkout(Some(&opts(StrategyFlags::SAFE))).unwrap();

    repo.assert_file_not_exists("b.md");
}

#[test]
fn test_safe_create_recreates_missing_file() {
    let (repo, handle) = setup_committed_repo();
    repo.remove("b.md");

    handle.checkout(Some(&opts(StrategyFlags::SAFE_CREATE))).unwrap();

    assert_eq!(repo.read("b.md"), "bee");
}

#[test]
fn test_update_only_suppresses_creation() {
    let (repo, handle) = setup_committed_repo();
    repo.remove("b.md");

    handle
        .checkout(Some(&opts(StrategyFlags::SAFE_CREATE | StrategyFlags::UPDATE_ONLY)))
        .unwrap();

    repo.assert_file_not_exists("b.md");
}

#[test]
fn test_allow_conflicts_keeps_local_edit() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local edit");

    handle
        .checkout(Some(&opts(StrategyFlags::SAFE | StrategyFlags::ALLOW_CONFLICTS)))
        .unwrap();

    assert_eq!(repo.read("a.txt"), "local edit");
}

#[test]
fn test_first_conflict_in_traversal_order() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local a");
    repo.write("b.md", "local b");

    let err = handle.checkout(Some(&opts(StrategyFlags::SAFE))).unwrap_err();

    assert_eq!(err.first_conflict(), Some(&PathBuf::from("a.txt")));
    assert_eq!(repo.read("a.txt"), "local a");
    assert_eq!(repo.read("b.md"), "local b");
}

// ============================================================================
// Strategy validation
// ============================================================================

#[rstest]
#[case(StrategyFlags::FORCE | StrategyFlags::SAFE)]
#[case(StrategyFlags::FORCE | StrategyFlags::SAFE_CREATE)]
fn test_force_with_safe_is_rejected(#[case] flags: StrategyFlags) {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local edit");

    let err = handle.checkout(Some(&opts(flags))).unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidStrategy { flags: f } if f == flags));
    assert_eq!(repo.read("a.txt"), "local edit");
}

#[test]
fn test_inert_flags_are_accepted() {
    let (repo, handle) = setup_committed_repo();
    repo.remove("b.md");

    let flags = StrategyFlags::SAFE_CREATE
        | StrategyFlags::UPDATE_SUBMODULES
        | StrategyFlags::UPDATE_SUBMODULES_IF_CHANGED;
    handle.checkout(Some(&opts(flags))).unwrap();

    assert_eq!(repo.read("b.md"), "bee");
}

// ============================================================================
// Untracked and ignored files
// ============================================================================

#[test]
fn test_remove_untracked_keeps_ignored() {
    let (repo, handle) = setup_committed_repo();
    repo.write("notes.tmp", "scratch");
    repo.write("debug.log", "ignored");

    handle
        .checkout(Some(&opts(StrategyFlags::SAFE | StrategyFlags::REMOVE_UNTRACKED)))
        .unwrap();

    repo.assert_file_not_exists("notes.tmp");
    repo.assert_file_exists("debug.log");
}

#[test]
fn test_remove_ignored_keeps_untracked() {
    let (repo, handle) = setup_committed_repo();
    repo.write("notes.tmp", "scratch");
    repo.write("debug.log", "ignored");

    handle
        .checkout(Some(&opts(StrategyFlags::SAFE | StrategyFlags::REMOVE_IGNORED)))
        .unwrap();

    repo.assert_file_exists("notes.tmp");
    repo.assert_file_not_exists("debug.log");
}

#[test]
fn test_without_remove_flags_untracked_files_stay() {
    let (repo, handle) = setup_committed_repo();
    repo.write("notes.tmp", "scratch");

    handle.checkout(Some(&opts(StrategyFlags::FORCE))).unwrap();

    repo.assert_file_exists("notes.tmp");
}

// ============================================================================
// Index updates
// ============================================================================

fn setup_stale_head() -> (TestRepo, RepositoryHandle) {
    let repo = TestRepo::new();
    let first = repo.commit(&[("a.txt", "one")], "First");
    repo.commit(&[("a.txt", "two")], "Second");
    // HEAD back at "one"; index and working tree still at "two".
    repo.move_head(first);
    let handle = RepositoryHandle::open(repo.root()).unwrap();
    (repo, handle)
}

#[test]
fn test_force_updates_index_to_head() {
    let (repo, handle) = setup_stale_head();

    handle.checkout(Some(&opts(StrategyFlags::FORCE))).unwrap();

    assert_eq!(repo.read("a.txt"), "one");
    assert_eq!(index_blob(&repo, "a.txt"), blob_id("one"));
}

#[test]
fn test_dont_update_index_leaves_entries() {
    let (repo, handle) = setup_stale_head();

    handle
        .checkout(Some(&opts(StrategyFlags::FORCE | StrategyFlags::DONT_UPDATE_INDEX)))
        .unwrap();

    assert_eq!(repo.read("a.txt"), "one");
    assert_eq!(index_blob(&repo, "a.txt"), blob_id("two"));
}

// ============================================================================
// Path filters
// ============================================================================

#[test]
fn test_pathspec_limits_checkout() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local a");
    repo.write("b.md", "local b");

    let opts = opts(StrategyFlags::FORCE).path("*.txt");
    handle.checkout(Some(&opts)).unwrap();

    assert_eq!(repo.read("a.txt"), "one");
    assert_eq!(repo.read("b.md"), "local b");
}

#[test]
fn test_disable_pathspec_match_treats_paths_literally() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local a");

    let opts = opts(StrategyFlags::FORCE | StrategyFlags::DISABLE_PATHSPEC_MATCH).path("*.txt");
    handle.checkout(Some(&opts)).unwrap();

    assert_eq!(repo.read("a.txt"), "local a");
}

#[test]
fn test_exact_path_with_pathspec_match_disabled() {
    let (repo, handle) = setup_committed_repo();
    repo.write("a.txt", "local a");
    repo.write("b.md", "local b");

    let opts = opts(StrategyFlags::FORCE | StrategyFlags::DISABLE_PATHSPEC_MATCH).path("b.md");
    handle.checkout(Some(&opts)).unwrap();

    assert_eq!(repo.read("a.txt"), "local a");
    assert_eq!(repo.read("b.md"), "bee");
}

// ============================================================================
// File and directory modes
// ============================================================================

#[cfg(unix)]
mod modes {
    use super::*;
    use repo_checkout::FileMode;
    use std::os::unix::fs::PermissionsExt;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    fn setup_mode_repo() -> (TestRepo, RepositoryHandle) {
        let repo = TestRepo::new();
        repo.commit(&[("plain.txt", "text"), ("nested/deep/file.txt", "deep")], "Files");
        repo.commit_executable("run.sh", "#!/bin/sh\n", "Script");
        let handle = RepositoryHandle::open(repo.root()).unwrap();
        (repo, handle)
    }

    #[test]
    fn test_default_file_modes_follow_blob() {
        let (repo, handle) = setup_mode_repo();
        repo.remove("plain.txt");
        repo.remove("run.sh");

        handle.checkout(Some(&opts(StrategyFlags::SAFE_CREATE))).unwrap();

        assert_eq!(mode_of(&repo.path("plain.txt")), 0o644);
        assert_eq!(mode_of(&repo.path("run.sh")), 0o755);
    }

    #[test]
    fn test_fixed_file_mode_applies_to_every_file() {
        let (repo, handle) = setup_mode_repo();
        repo.remove("plain.txt");

        let opts = opts(StrategyFlags::SAFE_CREATE).file_mode(FileMode::Fixed(0o600));
        handle.checkout(Some(&opts)).unwrap();

        assert_eq!(mode_of(&repo.path("plain.txt")), 0o600);
    }

    #[test]
    fn test_default_dir_mode() {
        let (repo, handle) = setup_mode_repo();
        fs::remove_dir_all(repo.path("nested")).unwrap();

        handle.checkout(Some(&opts(StrategyFlags::SAFE_CREATE))).unwrap();

        assert_eq!(repo.read("nested/deep/file.txt"), "deep");
        assert_eq!(mode_of(&repo.path("nested")), 0o755);
        assert_eq!(mode_of(&repo.path("nested/deep")), 0o755);
    }

    #[test]
    fn test_custom_dir_mode() {
        let (repo, handle) = setup_mode_repo();
        fs::remove_dir_all(repo.path("nested")).unwrap();

        let opts = opts(StrategyFlags::SAFE_CREATE).dir_mode(0o700);
        handle.checkout(Some(&opts)).unwrap();

        assert_eq!(mode_of(&repo.path("nested/deep")), 0o700);
    }
}

// ============================================================================
// Engine failures
// ============================================================================

#[test]
fn test_unborn_head_is_engine_error() {
    let repo = TestRepo::new();
    let handle = RepositoryHandle::open(repo.root()).unwrap();

    let err = handle.checkout(Some(&opts(StrategyFlags::SAFE))).unwrap_err();

    let engine = err.engine().expect("engine error");
    assert!(engine.code < 0);
    assert!(matches!(err, CheckoutError::Engine(_)));
}
