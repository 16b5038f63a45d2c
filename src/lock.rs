//! Advisory per-mirror locking.
//!
//! Two overlapping scheduler runs must not clone or fetch into the same path
//! at once. Each clone/update holds an exclusive flock on a lock file named
//! after the mirror; a pass that finds the lock taken skips that entry and
//! leaves it for the next run.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

/// A guard that holds an exclusive lock on one mirror.
/// The lock is released when dropped.
#[derive(Debug)]
pub struct MirrorLock {
    file: File,
}

impl MirrorLock {
    /// Try to acquire the lock without blocking, creating the lock file and
    /// its parent directories if needed.
    /// Returns `None` if the lock is held by another process.
    pub fn try_acquire(lock_path: &Path) -> io::Result<Option<Self>> {
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for MirrorLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn try_acquire_creates_lock_file_and_parents() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join(".locks").join("octocat__Hello-World.lock");

        assert!(!lock_path.exists());
        let lock = MirrorLock::try_acquire(&lock_path).unwrap();
        assert!(lock.is_some());
        assert!(lock_path.exists());
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("mirror.lock");

        let _held = MirrorLock::try_acquire(&lock_path).unwrap().unwrap();
        assert!(MirrorLock::try_acquire(&lock_path).unwrap().is_none());
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("mirror.lock");

        {
            let _held = MirrorLock::try_acquire(&lock_path).unwrap().unwrap();
            assert!(MirrorLock::try_acquire(&lock_path).unwrap().is_none());
        }
        assert!(MirrorLock::try_acquire(&lock_path).unwrap().is_some());
    }

    #[test]
    fn two_threads_cannot_hold_the_same_lock() {
        let dir = tempdir().unwrap();
        let lock_path = Arc::new(dir.path().join("mirror.lock"));
        let barrier = Arc::new(Barrier::new(2));

        let holder_path = Arc::clone(&lock_path);
        let holder_barrier = Arc::clone(&barrier);
        let holder = thread::spawn(move || {
            let lock = MirrorLock::try_acquire(&holder_path).unwrap().unwrap();
            holder_barrier.wait();
            thread::sleep(std::time::Duration::from_millis(100));
            drop(lock);
        });

        let contender = thread::spawn(move || {
            barrier.wait();
            let result = MirrorLock::try_acquire(&lock_path).unwrap();
            assert!(result.is_none(), "lock held elsewhere must not be acquired");
        });

        holder.join().unwrap();
        contender.join().unwrap();
    }
}
