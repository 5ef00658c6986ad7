//! coursemap - Git-backed learning content store
//!
//! A hierarchical corpus of learning content (courses → modules →
//! topics) where each topic has a free-text body and a completion
//! flag, and every mutation is snapshotted into a git ledger.
//!
//! # Architecture
//!
//! The store keeps three kinds of durable state mutually consistent:
//! - A global index mapping course ids to course slugs
//! - One structural metadata record per course
//! - One markdown body file per topic
//!
//! Mutations are whole-record read-modify-writes serialized by an
//! in-process mutex plus a cross-process file lock; after each
//! mutation the whole content root is committed to git, best-effort.
//!
//! # Modules
//!
//! - `store`: Durable layer (index, metadata, content files, slugs)
//! - `domain`: Data structures (Course, Module, Topic, SearchResult)
//! - `core`: Orchestration (ContentRepository, SearchEngine)
//! - `ledger`: Version-control snapshots (git subprocess)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Create a course and add content
//! coursemap create-course CS101 "Algorithms"
//! coursemap add-module 1 "Sorting"
//! coursemap add-topic 1 1 "Quicksort" --priority high --time 30
//!
//! # Track progress
//! coursemap update-topic 1 1 1 --completed true
//!
//! # Search everything
//! coursemap search quicksort
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ledger;
pub mod store;

// Re-export main types at crate root for convenience
pub use crate::core::{
    ContentRepository, NewTopic, RepositoryError, SearchEngine, TopicPatch, TopicWithContent,
};
pub use crate::domain::{Course, Module, Priority, SearchResult, Topic};
pub use crate::ledger::{GitLedger, Ledger, NoopLedger};
pub use crate::store::{slugify, ContentFileStore, CourseMetadataStore, Index, IndexStore};
