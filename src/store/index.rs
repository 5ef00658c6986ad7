//! Global course index.
//!
//! The index is the single source of truth for mapping course ids to
//! their storage location (the course slug). It lives at
//! `<root>/index.json` and is rewritten atomically on every change so
//! a crashed writer can never leave a partially-written index behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::write_atomic;

/// One index entry per course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRef {
    /// Globally unique course id
    pub id: u32,

    /// Directory name under the courses root
    pub slug: String,
}

/// The global course index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    /// All courses in creation order
    pub courses: Vec<CourseRef>,

    /// Counter for the next course id
    #[serde(default)]
    pub next_id: u32,
}

impl Index {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next course id and advance the counter.
    ///
    /// Indexes written before the counter existed (next_id = 0) still
    /// allocate `count + 1`, preserving the id sequence they were
    /// created under.
    pub fn allocate_course_id(&mut self) -> u32 {
        let id = self.next_id.max(self.courses.len() as u32 + 1);
        self.next_id = id + 1;
        id
    }

    /// Look up a course entry by id
    pub fn find(&self, course_id: u32) -> Option<&CourseRef> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// Append a new course entry
    pub fn push(&mut self, id: u32, slug: impl Into<String>) {
        self.courses.push(CourseRef {
            id,
            slug: slug.into(),
        });
    }
}

/// Reads and writes the persisted index
#[derive(Debug, Clone)]
pub struct IndexStore {
    /// Path to index.json
    path: PathBuf,
}

impl IndexStore {
    /// Create a store for the index at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index.
    ///
    /// A missing file is a first run and yields an empty index. An
    /// unparseable file is corruption of the durable layer and fails
    /// loudly instead of silently reinitializing.
    pub async fn load(&self) -> Result<Index> {
        if !self.path.exists() {
            return Ok(Index::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read index: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse index: {}", self.path.display()))
    }

    /// Persist the index atomically (temp file + rename)
    pub async fn save(&self, index: &Index) -> Result<()> {
        let content = serde_json::to_string_pretty(index)?;
        write_atomic(&self.path, content)
            .await
            .with_context(|| format!("Failed to write index: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (IndexStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = IndexStore::new(temp.path().join("index.json"));
        (store, temp)
    }

    #[tokio::test]
    async fn test_load_missing_returns_empty() {
        let (store, _temp) = test_store();

        let index = store.load().await.unwrap();
        assert!(index.courses.is_empty());
        assert_eq!(index.next_id, 0);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let (store, _temp) = test_store();

        let mut index = Index::new();
        let id = index.allocate_course_id();
        index.push(id, "cs101-algorithms");
        store.save(&index).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.courses.len(), 1);
        assert_eq!(loaded.courses[0].id, 1);
        assert_eq!(loaded.courses[0].slug, "cs101-algorithms");
        assert_eq!(loaded.next_id, 2);
    }

    #[tokio::test]
    async fn test_corrupt_index_fails_loudly() {
        let (store, _temp) = test_store();

        tokio::fs::write(store.path(), "{not json").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_allocation_sequence() {
        let mut index = Index::new();
        assert_eq!(index.allocate_course_id(), 1);
        index.push(1, "a");
        assert_eq!(index.allocate_course_id(), 2);
        index.push(2, "b");
        assert_eq!(index.next_id, 3);
    }

    #[test]
    fn test_allocation_without_counter() {
        // Index written by an older layout: entries but no counter.
        let json = r#"{"courses":[{"id":1,"slug":"a"},{"id":2,"slug":"b"}]}"#;
        let mut index: Index = serde_json::from_str(json).unwrap();

        assert_eq!(index.allocate_course_id(), 3);
    }

    #[test]
    fn test_find() {
        let mut index = Index::new();
        index.push(1, "a");
        index.push(2, "b");

        assert_eq!(index.find(2).unwrap().slug, "b");
        assert!(index.find(3).is_none());
    }
}
