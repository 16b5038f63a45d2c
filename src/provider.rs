//! Remote hosting providers.
//!
//! A provider is a pure naming convention: given an owner/repo identity it
//! derives the remote URLs. Only GitHub exists today; new hosts slot in as
//! additional variants.

use crate::types::RepoKey;

/// The hosting provider a catalog entry lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Github,
}

impl Provider {
    /// HTTPS clone URL for the given repository. This is the URL all clone
    /// and update operations go through.
    pub fn https_url(&self, key: &RepoKey) -> String {
        match self {
            Provider::Github => format!("https://github.com/{}/{}.git", key.owner, key.repo),
        }
    }

    /// SSH URL for the given repository. Derived for parity with the HTTPS
    /// form; no operation currently clones over SSH.
    pub fn ssh_url(&self, key: &RepoKey) -> String {
        match self {
            Provider::Github => format!("git@github.com:{}/{}.git", key.owner, key.repo),
        }
    }
}
