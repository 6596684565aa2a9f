//! Checkout of HEAD or an index snapshot into the working tree

use std::cell::RefCell;
use std::path::PathBuf;

use git2::{CheckoutNotificationType, ErrorClass, ErrorCode, Index};

use crate::error::{CheckoutError, EngineError};
use crate::options::CheckoutOptions;
use crate::repository::RepositoryHandle;
use crate::strategy::BaseStrategy;
use crate::translate::{CheckoutConfig, resolve_checkout};

/// Where the checkout takes its target file state from.
enum Target<'a> {
    Head,
    Index(&'a mut Index),
}

impl Target<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Index(_) => "index",
        }
    }
}

impl RepositoryHandle {
    /// Update the working tree, and the index, to match the commit HEAD
    /// points at.
    ///
    /// `None` options resolve to a dry run. Unless `DONT_UPDATE_INDEX` is set
    /// the index matches HEAD afterwards; with it set the index may be stale
    /// relative to the working tree.
    ///
    /// Under `SAFE`/`SAFE_CREATE` the first tracked file whose content
    /// diverges from HEAD aborts the checkout with
    /// [`CheckoutError::Conflict`] before anything is written.
    pub fn checkout(&self, opts: Option<&CheckoutOptions>) -> Result<(), CheckoutError> {
        run_checkout(self, Target::Head, opts)
    }

    /// Update the working tree to match `index`.
    ///
    /// The engine requires mutable access to the index, but the checkout only
    /// reads from it.
    pub fn checkout_index(
        &self,
        index: &mut Index,
        opts: Option<&CheckoutOptions>,
    ) -> Result<(), CheckoutError> {
        run_checkout(self, Target::Index(index), opts)
    }
}

fn run_checkout(
    handle: &RepositoryHandle,
    target: Target<'_>,
    opts: Option<&CheckoutOptions>,
) -> Result<(), CheckoutError> {
    let config = resolve_checkout(opts);
    check_strategy(&config)?;

    tracing::debug!(from = target.label(), config = ?config, "Running checkout");

    let guard = ConflictGuard::new(&config);
    let conflicts = RefCell::new(Vec::new());
    let result = {
        let mut builder = config.to_builder();
        builder.notify_on(CheckoutNotificationType::CONFLICT | CheckoutNotificationType::DIRTY);
        builder.notify(|why, path, _baseline, _target, workdir| {
            let Some(path) = path else {
                return true;
            };
            if !guard.is_conflict(why, workdir.is_some()) {
                return true;
            }
            conflicts.borrow_mut().push(path.to_path_buf());
            guard.tolerated
        });

        let repo = handle.repository();
        match target {
            Target::Head => repo.checkout_head(Some(&mut builder)),
            Target::Index(index) => repo.checkout_index(Some(index), Some(&mut builder)),
        }
    };
    let conflicts = conflicts.into_inner();

    if !guard.tolerated && !conflicts.is_empty() {
        return Err(aborted_on_conflict(result.err(), conflicts));
    }

    match result {
        Ok(()) => {
            if !conflicts.is_empty() {
                tracing::debug!(count = conflicts.len(), "Checkout completed with conflicts allowed");
            }
            Ok(())
        }
        Err(err) => Err(classify(err.into(), conflicts)),
    }
}

/// Decides which engine notifications count as conflicts.
///
/// Under `SAFE`/`SAFE_CREATE` a tracked file whose on-disk content diverges
/// from the expected old state is a conflict even when the engine would just
/// skip it. A file missing from the working tree never is.
struct ConflictGuard {
    guard_dirty: bool,
    tolerated: bool,
}

impl ConflictGuard {
    fn new(config: &CheckoutConfig) -> Self {
        let flags = config.strategy;
        Self {
            guard_dirty: matches!(flags.base(), BaseStrategy::Safe | BaseStrategy::SafeCreate),
            tolerated: flags.tolerates_conflicts(),
        }
    }

    fn is_conflict(&self, why: CheckoutNotificationType, on_disk: bool) -> bool {
        why.contains(CheckoutNotificationType::CONFLICT)
            || (self.guard_dirty && on_disk && why.contains(CheckoutNotificationType::DIRTY))
    }
}

fn check_strategy(config: &CheckoutConfig) -> Result<(), CheckoutError> {
    if !config.strategy.is_consistent() {
        return Err(CheckoutError::InvalidStrategy {
            flags: config.strategy,
        });
    }

    let inert = config.strategy.inert();
    if !inert.is_empty() {
        tracing::warn!(flags = ?inert, "Checkout flags are not implemented by the engine and have no effect");
    }

    Ok(())
}

/// The checkout stopped at the first conflict; nothing was written.
fn aborted_on_conflict(engine: Option<git2::Error>, paths: Vec<PathBuf>) -> CheckoutError {
    let source = match engine {
        Some(err) if err.code() == ErrorCode::Conflict => EngineError::from(err),
        _ => EngineError::from(git2::Error::new(
            ErrorCode::Conflict,
            ErrorClass::Checkout,
            format!("{} conflicts with the checkout target", paths[0].display()),
        )),
    };

    tracing::debug!(first = %paths[0].display(), "Checkout aborted on conflict");
    CheckoutError::Conflict { paths, source }
}

fn classify(engine: EngineError, conflicts: Vec<PathBuf>) -> CheckoutError {
    if engine.is_conflict() {
        CheckoutError::Conflict {
            paths: conflicts,
            source: engine,
        }
    } else {
        CheckoutError::Engine(engine)
    }
}
