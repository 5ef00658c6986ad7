//! Cross-process write serialization.
//!
//! Mutations are whole-record read-modify-writes over shared files, so
//! two writers racing on the same course (or on the index) would
//! silently clobber each other. An exclusive lock on a file at the
//! content root is held for the full span of each mutation.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use fs2::FileExt;

/// File name of the lock file at the content root
pub const LOCK_FILE: &str = ".coursemap.lock";

/// An exclusive lock over the content root, released on drop
#[derive(Debug)]
pub struct WriteLock {
    file: File,
}

impl WriteLock {
    /// Acquire the write lock, blocking until any other holder (in
    /// this process or another) releases it.
    pub async fn acquire(root: &Path) -> Result<Self> {
        let root = root.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<Self> {
            std::fs::create_dir_all(&root)
                .with_context(|| format!("Failed to create content root: {}", root.display()))?;

            let path = root.join(LOCK_FILE);
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&path)
                .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock: {}", path.display()))?;

            Ok(Self { file })
        })
        .await
        .context("Lock acquisition task failed")?
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
