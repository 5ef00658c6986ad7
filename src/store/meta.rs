//! Per-course structural metadata.
//!
//! Each course directory carries a single `course.json` holding the
//! full module/topic tree. Every structural mutation is a whole-record
//! read-modify-write; the repository serializes writers around it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

use crate::domain::Course;

use super::write_atomic;

/// File name of the per-course metadata record
const META_FILE: &str = "course.json";

/// Reads and writes one metadata record per course
#[derive(Debug, Clone)]
pub struct CourseMetadataStore {
    /// Directory containing one subdirectory per course
    courses_dir: PathBuf,
}

impl CourseMetadataStore {
    /// Create a store rooted at the given courses directory
    pub fn new(courses_dir: impl Into<PathBuf>) -> Self {
        Self {
            courses_dir: courses_dir.into(),
        }
    }

    /// Directory for one course
    pub fn course_dir(&self, course_slug: &str) -> PathBuf {
        self.courses_dir.join(course_slug)
    }

    /// Whether the course directory already exists
    pub fn course_exists(&self, course_slug: &str) -> bool {
        self.course_dir(course_slug).exists()
    }

    /// Load a course's metadata.
    ///
    /// Returns None when the record does not exist. A record that
    /// exists but cannot be parsed is a fault of the durable layer and
    /// fails loudly.
    pub async fn load(&self, course_slug: &str) -> Result<Option<Course>> {
        let path = self.course_dir(course_slug).join(META_FILE);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read course metadata: {}", path.display()))?;

        let course = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse course metadata: {}", path.display()))?;

        Ok(Some(course))
    }

    /// Persist a course's metadata, creating its directory if absent
    pub async fn save(&self, course_slug: &str, course: &Course) -> Result<()> {
        let path = self.course_dir(course_slug).join(META_FILE);
        let content = serde_json::to_string_pretty(course)?;

        write_atomic(&path, content)
            .await
            .with_context(|| format!("Failed to write course metadata: {}", path.display()))
    }
}
