//! Durable storage for the content hierarchy.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/                           # git working directory
//! ├── index.json                    # global course id -> slug index
//! └── courses/
//!     └── <course-slug>/
//!         ├── course.json           # structural metadata for one course
//!         └── <module-slug>/
//!             └── <topic-slug>.md   # topic body content
//! ```
//!
//! Records are rewritten whole on every change; there are no partial
//! updates. Writers coordinate through [`lock::WriteLock`].

pub mod content;
pub mod index;
pub mod lock;
pub mod meta;
pub mod slug;

pub use content::ContentFileStore;
pub use index::{CourseRef, Index, IndexStore};
pub use lock::WriteLock;
pub use meta::CourseMetadataStore;
pub use slug::slugify;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Write a file atomically: write to a temp file in the target's
/// directory, then rename over the target. Readers either see the old
/// content or the new content, never a partial write.
pub(crate) async fn write_atomic(path: &Path, contents: String) -> Result<()> {
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let dir = path
            .parent()
            .with_context(|| format!("No parent directory for {}", path.display()))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(contents.as_bytes())
            .context("Failed to write temp file")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to persist {}", path.display()))?;

        Ok(())
    })
    .await
    .context("Atomic write task failed")?
}
