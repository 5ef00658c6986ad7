//! Content repository: the public operations over the store.
//!
//! Composes the index, metadata, and content stores with the
//! version-control ledger. Every mutation follows the same shape:
//! take the write locks, re-read durable state, mutate in memory,
//! write back atomically, then record a best-effort ledger revision.
//! Reads take no lock and re-read durable state on every call.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::domain::{Course, Module, Priority, SearchResult, Topic};
use crate::ledger::{GitLedger, Ledger};
use crate::store::content::topic_template;
use crate::store::{
    slugify, ContentFileStore, CourseMetadataStore, Index, IndexStore, WriteLock,
};

use super::search::SearchEngine;

/// Errors surfaced to the repository's callers
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Course not found: {0}")]
    CourseNotFound(u32),

    #[error("Module not found: {0}")]
    ModuleNotFound(u32),

    #[error("Topic not found: {0}")]
    TopicNotFound(u32),

    #[error("Course already exists: {0}")]
    CourseExists(String),

    #[error("Module already exists: {0}")]
    ModuleExists(String),

    #[error("Topic already exists: {0}")]
    TopicExists(String),

    /// Broken durable layer (failed read/write for reasons other than
    /// absence); fatal for the operation
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Input for creating a topic
#[derive(Debug, Clone)]
pub struct NewTopic {
    /// Topic title
    pub title: String,

    /// Study priority (default: medium)
    pub priority: Priority,

    /// Estimated study time in minutes (default: 15)
    pub time: u32,
}

impl NewTopic {
    /// Create a topic spec with default priority and time
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: Priority::default(),
            time: 15,
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the time estimate
    pub fn with_time(mut self, time: u32) -> Self {
        self.time = time;
        self
    }
}

/// Partial update of a topic; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TopicPatch {
    /// Replace the content file body
    pub content: Option<String>,

    /// Set the completion flag
    pub completed: Option<bool>,
}

/// A topic together with its content file body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicWithContent {
    #[serde(flatten)]
    pub topic: Topic,

    /// Body text; empty when the content file does not exist
    pub content: String,
}

/// Orchestrates the stores and the ledger into the public operations
pub struct ContentRepository {
    /// Content root (also the ledger working directory)
    root: PathBuf,

    index: IndexStore,
    meta: CourseMetadataStore,
    content: ContentFileStore,
    search_engine: SearchEngine,
    ledger: Box<dyn Ledger>,

    /// In-process mutation serialization; the cross-process half is an
    /// exclusive file lock taken per mutation
    write_lock: Mutex<()>,
}

impl ContentRepository {
    /// Open a repository at the given content root with a git ledger,
    /// initializing the directory layout and the git working directory
    /// on first use.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let ledger = GitLedger::new(&root);
        ledger.init().await?;

        Self::with_ledger(root, Box::new(ledger)).await
    }

    /// Open a repository with an injected ledger
    pub async fn with_ledger(root: impl Into<PathBuf>, ledger: Box<dyn Ledger>) -> Result<Self> {
        let root = root.into();
        let courses_dir = root.join("courses");

        fs::create_dir_all(&courses_dir)
            .await
            .with_context(|| format!("Failed to create courses directory: {}", courses_dir.display()))?;

        let index = IndexStore::new(root.join("index.json"));
        if !index.path().exists() {
            index.save(&Index::new()).await?;
        }

        // Keep the write-lock file out of ledger snapshots.
        let gitignore = root.join(".gitignore");
        if !gitignore.exists() {
            fs::write(&gitignore, format!("{}\n", crate::store::lock::LOCK_FILE))
                .await
                .with_context(|| format!("Failed to write {}", gitignore.display()))?;
        }

        let meta = CourseMetadataStore::new(&courses_dir);
        let content = ContentFileStore::new(&courses_dir);
        let search_engine = SearchEngine::new(meta.clone(), content.clone());

        Ok(Self {
            root,
            index,
            meta,
            content,
            search_engine,
            ledger,
            write_lock: Mutex::new(()),
        })
    }

    /// All courses in index order, with progress recomputed.
    ///
    /// Index entries whose metadata record is missing (a crash between
    /// the two writes of a creation) are skipped rather than failing
    /// the listing.
    pub async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let index = self.index.load().await?;
        let mut courses = Vec::new();

        for course_ref in &index.courses {
            if let Some(mut course) = self.meta.load(&course_ref.slug).await? {
                course.progress = course.progress();
                courses.push(course);
            }
        }

        Ok(courses)
    }

    /// Create a new course
    #[instrument(skip(self))]
    pub async fn create_course(&self, code: &str, name: &str) -> Result<Course, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let _fs_lock = WriteLock::acquire(&self.root).await?;

        let slug = slugify(&format!("{}-{}", code, name));
        if self.meta.course_exists(&slug) {
            return Err(RepositoryError::CourseExists(slug));
        }

        let mut index = self.index.load().await?;
        let id = index.allocate_course_id();

        let course = Course::new(id, code, name, slug.clone());
        self.meta.save(&slug, &course).await?;

        index.push(id, slug.clone());
        self.index.save(&index).await?;

        self.ledger
            .commit(&format!("Create course: {} - {}", code, name))
            .await;

        info!(course_id = id, %slug, "Created course");
        Ok(course)
    }

    /// Get a course by id, with progress recomputed
    pub async fn get_course(&self, course_id: u32) -> Result<Course, RepositoryError> {
        let index = self.index.load().await?;
        let course_ref = index
            .find(course_id)
            .ok_or(RepositoryError::CourseNotFound(course_id))?;

        let mut course = self
            .meta
            .load(&course_ref.slug)
            .await?
            .ok_or(RepositoryError::CourseNotFound(course_id))?;

        course.progress = course.progress();
        Ok(course)
    }

    /// Create a new module in a course
    #[instrument(skip(self))]
    pub async fn create_module(
        &self,
        course_id: u32,
        title: &str,
    ) -> Result<Module, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let _fs_lock = WriteLock::acquire(&self.root).await?;

        let mut course = self.load_course(course_id).await?;
        let course_slug = course.slug.clone();

        let module_slug = slugify(title);
        if course.modules.iter().any(|m| m.slug == module_slug) {
            return Err(RepositoryError::ModuleExists(module_slug));
        }

        self.content
            .ensure_module_dir(&course_slug, &module_slug)
            .await?;

        let id = course.allocate_module_id();
        let module = Module::new(id, title, module_slug);
        course.modules.push(module.clone());
        self.meta.save(&course_slug, &course).await?;

        self.ledger.commit(&format!("Add module: {}", title)).await;

        info!(course_id, module_id = id, "Created module");
        Ok(module)
    }

    /// Create a new topic in a module, seeded with the content template
    #[instrument(skip(self, spec), fields(title = %spec.title))]
    pub async fn create_topic(
        &self,
        course_id: u32,
        module_id: u32,
        spec: NewTopic,
    ) -> Result<Topic, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let _fs_lock = WriteLock::acquire(&self.root).await?;

        let mut course = self.load_course(course_id).await?;
        let course_slug = course.slug.clone();

        let module = course
            .module_mut(module_id)
            .ok_or(RepositoryError::ModuleNotFound(module_id))?;

        let topic_slug = slugify(&spec.title);
        if module.topics.iter().any(|t| t.slug == topic_slug) {
            return Err(RepositoryError::TopicExists(topic_slug));
        }

        let file = format!("{}/{}.md", module.slug, topic_slug);
        let id = module.allocate_topic_id();
        let topic = Topic {
            id,
            title: spec.title.clone(),
            slug: topic_slug,
            file: file.clone(),
            completed: false,
            priority: spec.priority,
            time: spec.time,
            locked: false,
        };
        module.topics.push(topic.clone());

        self.content
            .write(&course_slug, &file, &topic_template(&spec.title))
            .await?;
        self.meta.save(&course_slug, &course).await?;

        self.ledger
            .commit(&format!("Add topic: {}", spec.title))
            .await;

        info!(course_id, module_id, topic_id = id, "Created topic");
        Ok(topic)
    }

    /// Get a topic together with its content file body
    pub async fn get_topic(
        &self,
        course_id: u32,
        module_id: u32,
        topic_id: u32,
    ) -> Result<TopicWithContent, RepositoryError> {
        let course = self.load_course(course_id).await?;

        let module = course
            .module(module_id)
            .ok_or(RepositoryError::ModuleNotFound(module_id))?;
        let topic = module
            .topic(topic_id)
            .ok_or(RepositoryError::TopicNotFound(topic_id))?;

        let content = self.content.read(&course.slug, &topic.file).await?;

        Ok(TopicWithContent {
            topic: topic.clone(),
            content,
        })
    }

    /// Update a topic's content and/or completion flag.
    ///
    /// Each provided field is its own mutate-and-commit cycle with its
    /// own ledger message. Returns the fresh post-mutation view.
    #[instrument(skip(self, patch))]
    pub async fn update_topic(
        &self,
        course_id: u32,
        module_id: u32,
        topic_id: u32,
        patch: TopicPatch,
    ) -> Result<TopicWithContent, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let _fs_lock = WriteLock::acquire(&self.root).await?;

        let mut course = self.load_course(course_id).await?;
        let course_slug = course.slug.clone();

        let module = course
            .module_mut(module_id)
            .ok_or(RepositoryError::ModuleNotFound(module_id))?;
        let topic = module
            .topic_mut(topic_id)
            .ok_or(RepositoryError::TopicNotFound(topic_id))?;

        let title = topic.title.clone();
        let file = topic.file.clone();

        if let Some(body) = &patch.content {
            self.content.write(&course_slug, &file, body).await?;
            self.ledger
                .commit(&format!("Update topic: {}", title))
                .await;
        }

        if let Some(completed) = patch.completed {
            topic.completed = completed;
            let updated = topic.clone();
            self.meta.save(&course_slug, &course).await?;

            let message = if completed {
                format!("Mark complete: {}", title)
            } else {
                format!("Mark incomplete: {}", title)
            };
            self.ledger.commit(&message).await;

            let content = self.content.read(&course_slug, &file).await?;
            return Ok(TopicWithContent {
                topic: updated,
                content,
            });
        }

        let topic = course
            .module(module_id)
            .and_then(|m| m.topic(topic_id))
            .ok_or(RepositoryError::TopicNotFound(topic_id))?
            .clone();
        let content = self.content.read(&course_slug, &file).await?;

        Ok(TopicWithContent { topic, content })
    }

    /// Search across courses, modules, and topic content
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, RepositoryError> {
        let index = self.index.load().await?;
        Ok(self.search_engine.search(&index, query).await?)
    }

    /// Resolve a course id to its metadata record
    async fn load_course(&self, course_id: u32) -> Result<Course, RepositoryError> {
        let index = self.index.load().await?;
        let course_ref = index
            .find(course_id)
            .ok_or(RepositoryError::CourseNotFound(course_id))?;

        self.meta
            .load(&course_ref.slug)
            .await?
            .ok_or(RepositoryError::CourseNotFound(course_id))
    }
}
