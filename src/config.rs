//! Runtime configuration.
//!
//! Everything the sync pass needs to know about its environment lives in one
//! explicit struct: the mirror root, the catalog file, and whether external
//! commands are actually run. The defaults reproduce the tool's historical
//! behavior (`~/repos` and a `db.sqlite3` file in the working directory).

use std::path::PathBuf;

use crate::types::RepoKey;

/// Catalog database filename used when no `--db` override is given.
pub const DEFAULT_DB_FILE: &str = "db.sqlite3";

/// Directory under the user's home that mirrors default into.
const DEFAULT_ROOT_DIR: &str = "repos";

/// Configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem root the mirror tree is laid out under.
    pub root: PathBuf,
    /// Path to the SQLite catalog file.
    pub db_path: PathBuf,
    /// When set, clone/update commands are reported instead of executed.
    pub dry_run: bool,
}

impl Config {
    /// Build a config from optional CLI overrides. A leading `~` in either
    /// path is expanded to the user's home directory.
    pub fn new(root: Option<&str>, db: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            root: root.map(expand).unwrap_or(defaults.root),
            db_path: db.map(expand).unwrap_or(defaults.db_path),
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory holding per-mirror lock files: `{root}/.locks`.
    pub fn locks_dir(&self) -> PathBuf {
        self.root.join(".locks")
    }

    /// Lock file for one mirror: `{root}/.locks/{owner}__{repo}.lock`.
    pub fn lock_path(&self, key: &RepoKey) -> PathBuf {
        self.locks_dir()
            .join(format!("{}__{}.lock", key.owner.as_str(), key.repo.as_str()))
    }
}

impl Default for Config {
    fn default() -> Self {
        let root = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_ROOT_DIR);
        Self {
            root,
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            dry_run: false,
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_under_home() {
        let config = Config::default();
        assert!(config.root.ends_with(DEFAULT_ROOT_DIR));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert!(!config.dry_run);
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = Config::new(Some("/srv/mirrors"), Some("/srv/catalog.sqlite3"));
        assert_eq!(config.root, PathBuf::from("/srv/mirrors"));
        assert_eq!(config.db_path, PathBuf::from("/srv/catalog.sqlite3"));
    }

    #[test]
    fn tilde_is_expanded() {
        let config = Config::new(Some("~/mirrors"), None);
        assert!(!config.root.to_string_lossy().starts_with('~'));
        assert!(config.root.ends_with("mirrors"));
    }

    #[test]
    fn with_dry_run_sets_flag() {
        let config = Config::new(None, None).with_dry_run(true);
        assert!(config.dry_run);
    }

    #[test]
    fn lock_path_combines_owner_and_repo() {
        let config = Config::new(Some("/srv/mirrors"), None);
        let key: RepoKey = "octocat/Hello-World".parse().unwrap();
        assert_eq!(
            config.lock_path(&key),
            PathBuf::from("/srv/mirrors/.locks/octocat__Hello-World.lock")
        );
    }
}
