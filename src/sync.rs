//! The sync pass.
//!
//! One pass walks the catalog exactly once and, for each entry, either
//! bare-clones the remote (mirror absent) or refreshes its remote refs
//! (mirror present). Entries are independent: a failure is logged with its
//! identity, recorded in the report, and never stops the rest of the pass.

use std::fmt;

use crate::catalog::{Catalog, CatalogError};
use crate::config::Config;
use crate::git::GitCli;
use crate::lock::MirrorLock;
use crate::mirror::Mirror;
use crate::provider::Provider;

/// One failed entry, with enough identity for an operator to act on.
#[derive(Debug)]
pub struct EntryFailure {
    /// `owner/repo` when the identity parsed, otherwise the raw row fields.
    pub identity: String,
    pub reason: String,
}

/// Outcome of one pass over the catalog.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub cloned: usize,
    pub updated: usize,
    /// Entries skipped because another invocation held their mirror lock.
    pub skipped: usize,
    pub failures: Vec<EntryFailure>,
    pub dry_run: bool,
}

impl SyncReport {
    /// True when every entry was processed without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, identity: impl Into<String>, reason: impl fmt::Display) {
        let identity = identity.into();
        let reason = reason.to_string();
        log::warn!("{}: {}", identity, reason);
        self.failures.push(EntryFailure { identity, reason });
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cloned, updated) = if self.dry_run {
            ("would clone", "would update")
        } else {
            ("cloned", "updated")
        };
        write!(
            f,
            "{} {}, {} {}, {} skipped, {} failed",
            cloned,
            self.cloned,
            updated,
            self.updated,
            self.skipped,
            self.failures.len()
        )
    }
}

/// Run one full pass over the catalog.
///
/// Catalog-level failures (open, query, row decode) abort the pass and
/// surface as `Err`; per-entry failures end up in the report.
pub fn run_pass(
    config: &Config,
    catalog: &Catalog,
    git: &GitCli,
) -> Result<SyncReport, CatalogError> {
    let mut report = SyncReport {
        dry_run: config.dry_run,
        ..Default::default()
    };

    let mut cursor = catalog.entries()?;
    for row in cursor.rows()? {
        let entry = row?;

        let key = match entry.repo_key() {
            Ok(key) => key,
            Err(e) => {
                report.record_failure(
                    format!("{}/{}", entry.user_name, entry.repo_name),
                    format!("invalid identity in catalog row {}: {}", entry.id, e),
                );
                continue;
            }
        };

        let mirror = Mirror::new(key, Provider::Github, &config.root);
        sync_one(config, git, &mirror, &mut report);
    }

    Ok(report)
}

/// Clone-or-update a single mirror, recording the outcome.
fn sync_one(config: &Config, git: &GitCli, mirror: &Mirror, report: &mut SyncReport) {
    let key = mirror.key();
    let path = mirror.local_path();

    if config.dry_run {
        if mirror.exists() {
            println!("would update {} at {}", key, path.display());
            report.updated += 1;
        } else {
            println!(
                "would clone {} from {} into {}",
                key,
                mirror.https_url(),
                path.display()
            );
            report.cloned += 1;
        }
        return;
    }

    let lock_path = config.lock_path(key);
    let _lock = match MirrorLock::try_acquire(&lock_path) {
        Ok(Some(lock)) => lock,
        Ok(None) => {
            log::warn!("{}: locked by another invocation, skipping", key);
            report.skipped += 1;
            return;
        }
        Err(e) => {
            report.record_failure(key.to_string(), format!("failed to take mirror lock: {}", e));
            return;
        }
    };

    if mirror.exists() {
        log::info!("updating {} at {}", key, path.display());
        match mirror.update(git) {
            Ok(()) => report.updated += 1,
            Err(e) => report.record_failure(key.to_string(), e),
        }
    } else {
        log::info!("cloning {} from {}", key, mirror.https_url());
        match mirror.clone_bare(git) {
            Ok(()) => report.cloned += 1,
            Err(e) => report.record_failure(key.to_string(), e),
        }
    }
}
