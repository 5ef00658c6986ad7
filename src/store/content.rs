//! Topic body content files.
//!
//! Body text lives beside the metadata as plain markdown so edits diff
//! cleanly in the version-control ledger, independent of structural
//! changes. Absence of a body file is never a fault; it reads as
//! empty.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

/// Reads and writes topic body files under the courses root
#[derive(Debug, Clone)]
pub struct ContentFileStore {
    /// Directory containing one subdirectory per course
    courses_dir: PathBuf,
}

impl ContentFileStore {
    /// Create a store rooted at the given courses directory
    pub fn new(courses_dir: impl Into<PathBuf>) -> Self {
        Self {
            courses_dir: courses_dir.into(),
        }
    }

    /// Absolute path of a content file given its course-relative path
    pub fn file_path(&self, course_slug: &str, rel_path: &str) -> PathBuf {
        self.courses_dir.join(course_slug).join(rel_path)
    }

    /// Create a module's directory eagerly
    pub async fn ensure_module_dir(&self, course_slug: &str, module_slug: &str) -> Result<()> {
        let dir = self.courses_dir.join(course_slug).join(module_slug);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create module directory: {}", dir.display()))
    }

    /// Write a topic body verbatim, creating parent directories
    pub async fn write(&self, course_slug: &str, rel_path: &str, text: &str) -> Result<()> {
        let path = self.file_path(course_slug, rel_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write content file: {}", path.display()))
    }

    /// Read a topic body; a missing file reads as empty
    pub async fn read(&self, course_slug: &str, rel_path: &str) -> Result<String> {
        let path = self.file_path(course_slug, rel_path);

        if !path.exists() {
            return Ok(String::new());
        }

        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read content file: {}", path.display()))
    }
}

/// Starting body for a newly created topic: title heading plus
/// placeholder sections, so every topic begins with parseable
/// structure instead of an empty file.
pub fn topic_template(title: &str) -> String {
    format!(
        "# {}\n\n\
         ## Overview\n\
         Write your content here...\n\n\
         ## Key Concepts\n\n\
         ## Examples\n\n\
         ## Practice Problems\n",
        title
    )
}
