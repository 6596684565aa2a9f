//! Shared test utilities for the repo-checkout workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: free functions that build history in a `git2::Repository`
//! - [`repo`]: [`repo::TestRepo`], a temporary repository with assertions

pub mod git;
pub mod repo;
