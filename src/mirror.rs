//! The per-repository mirror descriptor.
//!
//! A `Mirror` is the in-memory view of one catalog entry: its identity, its
//! provider, and the root it is stored under. It derives the local path and
//! remote URLs and exposes the clone/update operations the sync pass drives.
//! Descriptors are built fresh for every entry on every pass and hold no
//! state of their own.

use std::path::{Path, PathBuf};

use crate::git::{GitCli, GitError};
use crate::provider::Provider;
use crate::types::RepoKey;

/// One trackable remote repository and its local bare mirror.
#[derive(Debug, Clone)]
pub struct Mirror {
    key: RepoKey,
    provider: Provider,
    root: PathBuf,
}

impl Mirror {
    /// Create a descriptor for `key` mirrored under `root`.
    pub fn new(key: RepoKey, provider: Provider, root: impl Into<PathBuf>) -> Self {
        Self {
            key,
            provider,
            root: root.into(),
        }
    }

    /// The repository identity this mirror tracks.
    pub fn key(&self) -> &RepoKey {
        &self.key
    }

    /// Canonical on-disk location: `{root}/{owner}/{repo}`.
    ///
    /// Pure function of the identity and root; never touches the filesystem.
    pub fn local_path(&self) -> PathBuf {
        self.root
            .join(self.key.owner.as_str())
            .join(self.key.repo.as_str())
    }

    /// HTTPS remote URL, used by clone.
    pub fn https_url(&self) -> String {
        self.provider.https_url(&self.key)
    }

    /// SSH remote URL. Parity data only; operations go over HTTPS.
    pub fn ssh_url(&self) -> String {
        self.provider.ssh_url(&self.key)
    }

    /// Whether anything exists at the mirror's local path.
    ///
    /// A pure filesystem probe: the directory left behind by an interrupted
    /// clone counts as existing, and the subsequent update will fail loudly
    /// rather than silently re-clone over it.
    pub fn exists(&self) -> bool {
        self.local_path().exists()
    }

    /// Bare-clone the remote into the canonical local path.
    pub fn clone_bare(&self, git: &GitCli) -> Result<(), GitError> {
        self.clone_bare_into(git, &self.local_path())
    }

    /// Bare-clone the remote into an explicit target path.
    pub fn clone_bare_into(&self, git: &GitCli, dest: &Path) -> Result<(), GitError> {
        git.clone_bare(&self.https_url(), dest)
    }

    /// Refresh all remote refs of the mirror at the canonical local path.
    pub fn update(&self, git: &GitCli) -> Result<(), GitError> {
        self.update_at(git, &self.local_path())
    }

    /// Refresh all remote refs of the repository at an explicit path.
    pub fn update_at(&self, git: &GitCli, path: &Path) -> Result<(), GitError> {
        git.remote_update(path)
    }
}
