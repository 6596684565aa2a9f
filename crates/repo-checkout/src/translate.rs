//! Translation of caller options into engine-ready configuration
//!
//! Resolution is pure and total: it never fails and never mutates its input.
//! The resolved values own all their data and are only turned into engine
//! builders at the call boundary.

use git2::build::CheckoutBuilder;
use serde::Serialize;

use crate::options::{
    Autotag, CheckoutOptions, CloneOptions, DEFAULT_DIR_MODE, DEFAULT_REMOTE_NAME, FileMode,
    FileOpenFlags,
};
use crate::strategy::{BaseStrategy, StrategyFlags};

/// Fully defaulted checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CheckoutConfig {
    pub strategy: StrategyFlags,
    pub disable_filters: bool,
    pub dir_mode: u32,
    pub file_mode: FileMode,
    pub file_open_flags: FileOpenFlags,
    pub paths: Vec<String>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        resolve_checkout(None)
    }
}

/// Branch to check out after the initial fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BranchSelection {
    RemoteHead,
    Named(String),
}

/// Fully defaulted clone configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CloneConfig {
    pub url: String,
    pub remote_name: String,
    pub push_url: String,
    pub push_spec: Option<String>,
    pub branch: BranchSelection,
    pub autotag: Autotag,
    pub checkout: CheckoutConfig,
}

/// Resolve checkout options, filling every unset field with its default.
///
/// `None` and `Some(&CheckoutOptions::default())` resolve to the same value.
pub fn resolve_checkout(opts: Option<&CheckoutOptions>) -> CheckoutConfig {
    resolve_checkout_with(opts, StrategyFlags::NONE)
}

fn resolve_checkout_with(
    opts: Option<&CheckoutOptions>,
    default_strategy: StrategyFlags,
) -> CheckoutConfig {
    let Some(opts) = opts else {
        return CheckoutConfig {
            strategy: default_strategy,
            disable_filters: false,
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: FileMode::BlobDictated,
            file_open_flags: FileOpenFlags::REQUIRED,
            paths: Vec::new(),
        };
    };

    CheckoutConfig {
        strategy: opts.strategy.unwrap_or(default_strategy),
        disable_filters: opts.disable_filters.unwrap_or(false),
        dir_mode: opts.dir_mode.map_or(DEFAULT_DIR_MODE, |mode| mode & 0o7777),
        file_mode: opts.file_mode.unwrap_or_default(),
        file_open_flags: opts.file_open_flags.unwrap_or_default() | FileOpenFlags::REQUIRED,
        paths: opts.paths.clone(),
    }
}

/// Resolve clone options for cloning `url`.
///
/// The nested checkout defaults to a `SAFE` strategy; all its other fields
/// resolve exactly as [`resolve_checkout`] would.
pub fn resolve_clone(url: &str, opts: Option<&CloneOptions>) -> CloneConfig {
    let opts = opts.cloned().unwrap_or_default();

    CloneConfig {
        url: url.to_string(),
        remote_name: opts
            .remote_name
            .unwrap_or_else(|| DEFAULT_REMOTE_NAME.to_string()),
        push_url: opts.push_url.unwrap_or_else(|| url.to_string()),
        push_spec: opts.push_spec,
        branch: opts
            .checkout_branch
            .map_or(BranchSelection::RemoteHead, BranchSelection::Named),
        autotag: opts.autotag.unwrap_or_default(),
        checkout: resolve_checkout_with(opts.checkout.as_ref(), StrategyFlags::SAFE),
    }
}

impl CheckoutConfig {
    /// Whether this configuration writes anything to disk.
    pub fn is_dry_run(&self) -> bool {
        self.strategy.base() == BaseStrategy::DryRun
    }

    /// Build the engine's checkout builder for this configuration.
    ///
    /// Inert strategy members are not forwarded. The engine opens files with
    /// `CREATE | TRUNCATE | WRITE_ONLY`, which is what `file_open_flags`
    /// always resolves to.
    pub fn to_builder<'cb>(&self) -> CheckoutBuilder<'cb> {
        let flags = self.strategy.effective();
        let mut builder = CheckoutBuilder::new();

        match flags.base() {
            BaseStrategy::DryRun => {
                builder.dry_run();
            }
            BaseStrategy::Safe => {
                builder.safe().recreate_missing(false);
            }
            BaseStrategy::SafeCreate => {
                builder.safe().recreate_missing(true);
            }
            BaseStrategy::Force => {
                builder.force();
            }
        }

        builder
            .allow_conflicts(flags.contains(StrategyFlags::ALLOW_CONFLICTS))
            .remove_untracked(flags.contains(StrategyFlags::REMOVE_UNTRACKED))
            .remove_ignored(flags.contains(StrategyFlags::REMOVE_IGNORED))
            .update_only(flags.contains(StrategyFlags::UPDATE_ONLY))
            .update_index(!flags.contains(StrategyFlags::DONT_UPDATE_INDEX))
            .refresh(!flags.contains(StrategyFlags::NO_REFRESH))
            .skip_unmerged(flags.contains(StrategyFlags::SKIP_UNMERGED))
            .use_ours(flags.contains(StrategyFlags::USE_OURS))
            .use_theirs(flags.contains(StrategyFlags::USE_THEIRS))
            .disable_pathspec_match(flags.contains(StrategyFlags::DISABLE_PATHSPEC_MATCH))
            .disable_filters(self.disable_filters)
            .dir_perm(self.dir_mode as i32);

        if let FileMode::Fixed(mode) = self.file_mode {
            builder.file_perm((mode & 0o7777) as i32);
        }

        for path in &self.paths {
            builder.path(path.as_str());
        }

        builder
    }
}
