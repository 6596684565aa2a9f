//! Clone a remote into a new local repository

use std::path::Path;

use git2::build::RepoBuilder;
use git2::{FetchOptions, Remote, RemoteCallbacks, Repository};

use crate::error::{CloneError, EngineError};
use crate::options::{Autotag, CloneOptions};
use crate::repository::RepositoryHandle;
use crate::translate::{BranchSelection, CloneConfig, resolve_clone};

/// Clone `url` into `path` and check out the selected branch.
///
/// `None` options clone the remote's HEAD into a remote named `origin` and
/// check it out with a `SAFE` strategy.
///
/// The returned handle is reopened from `path` after the engine finishes, so
/// it reflects what is on disk.
///
/// # Partial clones
///
/// A failure after the engine started writing can leave a partial directory
/// tree at `path`. It is not cleaned up; callers that need a clean slate must
/// remove it themselves.
pub fn clone_repository(
    url: &str,
    path: impl AsRef<Path>,
    opts: Option<&CloneOptions>,
) -> Result<RepositoryHandle, CloneError> {
    if url.is_empty() {
        return Err(CloneError::EmptyUrl);
    }

    let path = path.as_ref();
    let config = resolve_clone(url, opts);

    let strategy = config.checkout.strategy;
    if !strategy.is_consistent() {
        return Err(CloneError::InvalidStrategy { flags: strategy });
    }
    if !strategy.inert().is_empty() {
        tracing::warn!(
            flags = ?strategy.inert(),
            "Checkout flags are not implemented by the engine and have no effect"
        );
    }

    tracing::debug!(url = %url, path = %path.display(), config = ?config, "Cloning repository");

    let cloned = repo_builder(&config)
        .clone(url, path)
        .map_err(|e| CloneError::Engine(e.into()))?;

    // The engine's initial fetch follows every tag regardless of policy.
    if config.autotag == Autotag::None {
        let dropped = drop_tags(&cloned).map_err(|e| CloneError::Engine(e.into()))?;
        tracing::debug!(count = dropped, "Dropped tags fetched during clone");
    }
    // The caller gets a fresh open, not the engine's handle.
    drop(cloned);

    let repo = Repository::open(path).map_err(|e| CloneError::Reopen {
        path: path.to_path_buf(),
        source: EngineError::from(e),
    })?;

    tracing::info!(url = %url, path = %path.display(), remote = %config.remote_name, "Cloned repository");

    Ok(RepositoryHandle::from(repo))
}

fn repo_builder(config: &CloneConfig) -> RepoBuilder<'_> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|progress| {
        tracing::trace!(
            received = progress.received_objects(),
            indexed = progress.indexed_objects(),
            total = progress.total_objects(),
            bytes = progress.received_bytes(),
            "Fetch progress"
        );
        true
    });

    let mut fetch = FetchOptions::new();
    fetch
        .remote_callbacks(callbacks)
        .download_tags(config.autotag.into());

    let mut builder = RepoBuilder::new();
    builder
        .fetch_options(fetch)
        .with_checkout(config.checkout.to_builder());

    if let BranchSelection::Named(branch) = &config.branch {
        builder.branch(branch);
    }

    builder.remote_create(move |repo, _name, url| create_remote(repo, config, url));
    builder
}

/// Create the clone's remote under the configured name, with its push
/// settings.
fn create_remote<'r>(
    repo: &'r Repository,
    config: &CloneConfig,
    url: &str,
) -> Result<Remote<'r>, git2::Error> {
    let name = config.remote_name.as_str();
    repo.remote(name, url)?;

    if config.push_url != url {
        repo.remote_set_pushurl(name, Some(&config.push_url))?;
    }
    if let Some(spec) = &config.push_spec {
        repo.remote_add_push(name, spec)?;
    }
    // git2 has no `remote_set_autotag`; write `remote.<name>.tagopt` the
    // same way libgit2's `git_remote_set_autotag` does.
    let tagopt_key = format!("remote.{name}.tagopt");
    match config.autotag {
        Autotag::None => repo.config()?.set_str(&tagopt_key, "--no-tags")?,
        Autotag::All => repo.config()?.set_str(&tagopt_key, "--tags")?,
        Autotag::Auto => match repo.config()?.remove(&tagopt_key) {
            Err(e) if e.code() != git2::ErrorCode::NotFound => return Err(e),
            _ => {}
        },
    }

    repo.find_remote(name)
}

/// Delete every `refs/tags/*` reference. Returns how many were removed.
fn drop_tags(repo: &Repository) -> Result<usize, git2::Error> {
    let mut names = Vec::new();
    for reference in repo.references_glob("refs/tags/*")? {
        if let Some(name) = reference?.name() {
            names.push(name.to_string());
        }
    }

    for name in &names {
        repo.find_reference(name)?.delete()?;
    }
    Ok(names.len())
}
