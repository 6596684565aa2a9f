//! Error types for repo-checkout

use std::fmt;
use std::path::PathBuf;

use crate::strategy::StrategyFlags;

/// Result type for repo-checkout operations that are not clone or checkout.
pub type Result<T> = std::result::Result<T, Error>;

/// An error reported by the repository engine.
///
/// Captured from the value the failing engine call returned, before any
/// other engine call is made, so later calls cannot overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Engine-defined error code (negative, e.g. `-13` for a checkout conflict).
    pub code: i32,
    /// Engine-defined error class (subsystem that raised the error).
    pub class: u32,
    pub kind: git2::ErrorCode,
    pub message: String,
}

impl EngineError {
    /// Whether the engine classified this failure as a checkout conflict.
    pub fn is_conflict(&self) -> bool {
        self.kind == git2::ErrorCode::Conflict
    }

    /// Whether the engine reported a missing object, reference or path.
    pub fn is_not_found(&self) -> bool {
        self.kind == git2::ErrorCode::NotFound
    }
}

impl From<git2::Error> for EngineError {
    fn from(err: git2::Error) -> Self {
        Self {
            code: err.raw_code(),
            class: err.raw_class(),
            kind: err.code(),
            message: err.message().to_string(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}, class {})", self.message, self.code, self.class)
    }
}

impl std::error::Error for EngineError {}

/// Errors returned by [`crate::RepositoryHandle::checkout`] and
/// [`crate::RepositoryHandle::checkout_index`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Conflicting checkout strategy: {flags:?}")]
    InvalidStrategy { flags: StrategyFlags },

    /// Paths are listed in the order the engine reached them.
    #[error("Checkout aborted by {} conflicting path(s): {source}", paths.len())]
    Conflict {
        paths: Vec<PathBuf>,
        #[source]
        source: EngineError,
    },

    #[error("Checkout failed: {0}")]
    Engine(#[from] EngineError),
}

impl CheckoutError {
    /// The first conflicting path in traversal order, if the engine reported any.
    pub fn first_conflict(&self) -> Option<&PathBuf> {
        match self {
            Self::Conflict { paths, .. } => paths.first(),
            _ => None,
        }
    }

    /// Engine code and message, when the failure came from the engine.
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            Self::Conflict { source, .. } => Some(source),
            Self::Engine(e) => Some(e),
            Self::InvalidStrategy { .. } => None,
        }
    }
}

/// Errors returned by [`crate::clone_repository`].
///
/// A clone that fails after the engine started writing may leave a partial
/// directory tree at the destination. It is not removed.
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("Clone URL must not be empty")]
    EmptyUrl,

    #[error("Conflicting checkout strategy for clone: {flags:?}")]
    InvalidStrategy { flags: StrategyFlags },

    #[error("Clone failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Cloned repository at {path} could not be reopened: {source}")]
    Reopen {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

impl CloneError {
    /// Engine code and message, when the failure came from the engine.
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            Self::Engine(e) | Self::Reopen { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Errors from opening repositories and loading option files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Engine(#[from] EngineError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} options at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} options for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported options format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Self::Engine(err.into())
    }
}
