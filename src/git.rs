//! External git invocation.
//!
//! All network and repository work is delegated to the system `git` binary;
//! this module only builds hardened commands, runs them, and turns non-zero
//! exits into typed errors carrying the captured stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors returned by git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// `git clone` exited non-zero.
    #[error("clone of {url} failed: {stderr}")]
    Clone { url: String, stderr: String },
    /// `git remote update` exited non-zero (missing or corrupt repository,
    /// network failure, authentication failure).
    #[error("remote update in {path} failed: {stderr}")]
    Update { path: PathBuf, stderr: String },
    /// Directory creation or process spawning failed. Distinct from the
    /// command-level failures above.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Git CLI wrapper.
///
/// Every command runs with prompts, hooks, and LFS smudging disabled so a
/// scheduled pass can never wedge on interactive input.
pub struct GitCli {
    git_path: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Create a new GitCli instance using the system git.
    pub fn new() -> Self {
        Self {
            git_path: "git".into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.git_path);
        cmd.env("GIT_LFS_SKIP_SMUDGE", "1");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.args(["-c", "core.hooksPath="]);
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Clone `url` as a bare repository into `dest`.
    ///
    /// Creates `dest` and any missing parent directories first; the creation
    /// is idempotent, and filesystem failures surface as [`GitError::Io`]
    /// rather than [`GitError::Clone`].
    pub fn clone_bare(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        std::fs::create_dir_all(dest)?;

        let output = self
            .command()
            .args(["clone", "--bare"])
            .arg(url)
            .arg(dest)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(GitError::Clone {
                url: url.to_string(),
                stderr,
            });
        }

        Ok(())
    }

    /// Fetch all remote refs for the repository at `repo_dir`.
    ///
    /// The bare store has no working tree, so this only moves stored refs.
    pub fn remote_update(&self, repo_dir: &Path) -> Result<(), GitError> {
        let output = self
            .command()
            .arg("-C")
            .arg(repo_dir)
            .args(["remote", "update"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(GitError::Update {
                path: repo_dir.to_path_buf(),
                stderr,
            });
        }

        Ok(())
    }

    /// Probe whether the git binary can be invoked at all.
    pub fn available(&self) -> bool {
        Command::new(&self.git_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
