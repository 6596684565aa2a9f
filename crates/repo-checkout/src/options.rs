//! Caller-facing checkout and clone options
//!
//! Every field is optional. `None` means "use the default"; a present zero
//! value is a deliberate setting and is kept as given.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::strategy::StrategyFlags;

/// Default permission for directories created during checkout.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission for files created from regular blobs.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Permission for files created from executable blobs.
pub const EXECUTABLE_FILE_MODE: u32 = 0o755;

/// Name given to the remote created by a clone.
pub const DEFAULT_REMOTE_NAME: &str = "origin";

bitflags! {
    /// Flags used to open each destination file during checkout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FileOpenFlags: u32 {
        const CREATE = 1 << 0;
        const TRUNCATE = 1 << 1;
        const WRITE_ONLY = 1 << 2;
    }
}

impl FileOpenFlags {
    /// Flags every checkout write needs. Append-style writes are not exposed.
    pub const REQUIRED: Self = Self::CREATE.union(Self::TRUNCATE).union(Self::WRITE_ONLY);
}

impl Default for FileOpenFlags {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// Permission policy for files created by a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileMode {
    /// 0644 for regular blobs, 0755 for executable blobs.
    #[default]
    BlobDictated,
    /// Use this mode for every created file.
    Fixed(u32),
}

impl FileMode {
    /// Permission bits for a file created from a blob.
    pub fn for_blob(self, executable: bool) -> u32 {
        match self {
            Self::BlobDictated if executable => EXECUTABLE_FILE_MODE,
            Self::BlobDictated => DEFAULT_FILE_MODE,
            Self::Fixed(mode) => mode & 0o7777,
        }
    }
}

/// Options for a checkout.
///
/// `CheckoutOptions::default()` is the "absent" value: every field unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckoutOptions {
    /// Defaults to [`StrategyFlags::NONE`] (dry run).
    pub strategy: Option<StrategyFlags>,
    /// Skip filters such as CRLF conversion. Defaults to `false`.
    pub disable_filters: Option<bool>,
    /// Defaults to 0755.
    pub dir_mode: Option<u32>,
    /// Defaults to [`FileMode::BlobDictated`].
    pub file_mode: Option<FileMode>,
    /// Defaults to `CREATE | TRUNCATE | WRITE_ONLY`.
    pub file_open_flags: Option<FileOpenFlags>,
    /// Restrict the checkout to these paths. Empty means the whole tree.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl CheckoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: StrategyFlags) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    pub fn strategy(mut self, strategy: StrategyFlags) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn disable_filters(mut self, on: bool) -> Self {
        self.disable_filters = Some(on);
        self
    }

    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = Some(mode);
        self
    }

    pub fn file_mode(mut self, mode: FileMode) -> Self {
        self.file_mode = Some(mode);
        self
    }

    pub fn file_open_flags(mut self, flags: FileOpenFlags) -> Self {
        self.file_open_flags = Some(flags);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }
}

/// Tag policy for a clone.
///
/// The policy is stored on the clone's remote and governs later fetches. The
/// engine's initial clone fetch always brings every tag along; with
/// [`Autotag::None`] those tags are deleted before the clone returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Autotag {
    /// Fetch tags pointing at fetched objects.
    #[default]
    Auto,
    /// Keep no tags.
    None,
    All,
}

impl From<Autotag> for git2::AutotagOption {
    fn from(value: Autotag) -> Self {
        match value {
            Autotag::Auto => git2::AutotagOption::Auto,
            Autotag::None => git2::AutotagOption::None,
            Autotag::All => git2::AutotagOption::All,
        }
    }
}

/// Options for a clone.
///
/// The nested `checkout` follows the same default rules as a standalone
/// [`CheckoutOptions`], except that an unset strategy means `SAFE`, so a
/// default clone populates its working tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CloneOptions {
    /// Defaults to `"origin"`.
    pub remote_name: Option<String>,
    /// Defaults to the fetch URL.
    pub push_url: Option<String>,
    /// Push refspec added to the remote. No default.
    pub push_spec: Option<String>,
    /// Defaults to the remote's HEAD.
    pub checkout_branch: Option<String>,
    pub autotag: Option<Autotag>,
    pub checkout: Option<CheckoutOptions>,
}

impl CloneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone and check out `branch` instead of the remote's HEAD.
    pub fn for_branch(branch: impl Into<String>) -> Self {
        Self {
            checkout_branch: Some(branch.into()),
            ..Self::default()
        }
    }

    pub fn remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }

    pub fn push_url(mut self, url: impl Into<String>) -> Self {
        self.push_url = Some(url.into());
        self
    }

    pub fn push_spec(mut self, spec: impl Into<String>) -> Self {
        self.push_spec = Some(spec.into());
        self
    }

    pub fn autotag(mut self, autotag: Autotag) -> Self {
        self.autotag = Some(autotag);
        self
    }

    pub fn checkout(mut self, checkout: CheckoutOptions) -> Self {
        self.checkout = Some(checkout);
        self
    }
}
