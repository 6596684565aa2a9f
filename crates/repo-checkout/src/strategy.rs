//! Checkout strategy flags
//!
//! Bit values follow the engine's `GIT_CHECKOUT_*` layout so a flag set can be
//! compared and logged against engine diagnostics. `SAFE_CREATE` occupies the
//! bit the current engine calls `RECREATE_MISSING`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// How a checkout may mutate the working tree.
    ///
    /// The empty set (`NONE`) is a dry run. `SAFE`, `SAFE_CREATE` and `FORCE`
    /// select the base strategy; every other flag is an independent modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StrategyFlags: u32 {
        /// Dry run, no working tree writes.
        const NONE = 0;
        /// Apply only updates that cannot destroy uncommitted changes.
        const SAFE = 1 << 0;
        /// Unconditionally overwrite working tree content.
        const FORCE = 1 << 1;
        /// `SAFE` plus creation of files missing from the working tree.
        const SAFE_CREATE = 1 << 2;
        /// Apply safe updates even when conflicts are found; conflicting
        /// files are left as they are.
        const ALLOW_CONFLICTS = 1 << 4;
        /// Remove untracked files that are not ignored.
        const REMOVE_UNTRACKED = 1 << 5;
        /// Remove ignored files not in the target.
        const REMOVE_IGNORED = 1 << 6;
        /// Only update files already present; never create new ones.
        const UPDATE_ONLY = 1 << 7;
        /// Write the working tree but leave index entries untouched.
        const DONT_UPDATE_INDEX = 1 << 8;
        /// Skip reloading index and config before checking out.
        const NO_REFRESH = 1 << 9;
        /// Skip files with unmerged index entries instead of failing.
        const SKIP_UNMERGED = 1 << 10;
        /// Resolve unmerged entries with the "ours" stage.
        const USE_OURS = 1 << 11;
        /// Resolve unmerged entries with the "theirs" stage.
        const USE_THEIRS = 1 << 12;
        /// Treat the path filter as exact paths instead of pathspecs.
        const DISABLE_PATHSPEC_MATCH = 1 << 13;
        /// Accepted but inert: the engine does not update submodules, so
        /// this member is never forwarded and only produces a warning.
        const UPDATE_SUBMODULES = 1 << 16;
        /// Accepted but inert, like [`StrategyFlags::UPDATE_SUBMODULES`].
        const UPDATE_SUBMODULES_IF_CHANGED = 1 << 17;
    }
}

/// The base strategy selected by a flag set, ignoring modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseStrategy {
    DryRun,
    Safe,
    SafeCreate,
    Force,
}

impl StrategyFlags {
    /// Members the engine accepts but does not act on.
    ///
    /// They stay in the flag set for comparison and serialization and are
    /// never forwarded to the engine.
    pub const INERT: Self = Self::UPDATE_SUBMODULES.union(Self::UPDATE_SUBMODULES_IF_CHANGED);

    /// Flags that select a base strategy.
    pub const BASE: Self = Self::SAFE.union(Self::SAFE_CREATE).union(Self::FORCE);

    /// Resolve the base strategy.
    ///
    /// With conflicting bits set, `FORCE` wins over `SAFE_CREATE`, which wins
    /// over `SAFE`. Callers that must not rely on this precedence check
    /// [`StrategyFlags::is_consistent`] first.
    pub fn base(self) -> BaseStrategy {
        if self.contains(Self::FORCE) {
            BaseStrategy::Force
        } else if self.contains(Self::SAFE_CREATE) {
            BaseStrategy::SafeCreate
        } else if self.contains(Self::SAFE) {
            BaseStrategy::Safe
        } else {
            BaseStrategy::DryRun
        }
    }

    /// `false` when `FORCE` is combined with `SAFE` or `SAFE_CREATE`.
    pub fn is_consistent(self) -> bool {
        !(self.contains(Self::FORCE) && self.intersects(Self::SAFE | Self::SAFE_CREATE))
    }

    /// The requested members that the engine will ignore.
    pub fn inert(self) -> Self {
        self & Self::INERT
    }

    /// The flag set with inert members removed.
    pub fn effective(self) -> Self {
        self - Self::INERT
    }

    /// Whether a detected conflict is allowed to resolve instead of aborting.
    pub fn tolerates_conflicts(self) -> bool {
        self.intersects(Self::ALLOW_CONFLICTS | Self::USE_OURS | Self::USE_THEIRS)
    }
}

impl Default for StrategyFlags {
    fn default() -> Self {
        Self::NONE
    }
}
