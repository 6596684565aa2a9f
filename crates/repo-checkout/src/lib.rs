//! Repository cloning and working-tree checkout
//!
//! Translates partially defaulted [`CheckoutOptions`] and [`CloneOptions`]
//! into engine configuration, runs the engine's clone and checkout
//! primitives, and reports failures as [`CloneError`] / [`CheckoutError`].
//!
//! ```rust,no_run
//! use repo_checkout::{CheckoutOptions, StrategyFlags, clone_repository};
//!
//! let repo = clone_repository("https://example.com/repo.git", "/tmp/repo", None)?;
//! repo.checkout(Some(&CheckoutOptions::with_strategy(StrategyFlags::FORCE)))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checkout;
pub mod clone;
pub mod config;
pub mod error;
pub mod logging;
pub mod options;
pub mod repository;
pub mod strategy;
pub mod translate;

pub use clone::clone_repository;
pub use config::OptionsStore;
pub use error::{CheckoutError, CloneError, EngineError, Error, Result};
pub use options::{Autotag, CheckoutOptions, CloneOptions, FileMode, FileOpenFlags};
pub use repository::RepositoryHandle;
pub use strategy::{BaseStrategy, StrategyFlags};
pub use translate::{BranchSelection, CheckoutConfig, CloneConfig, resolve_checkout, resolve_clone};
