//! Search result types.

use serde::{Deserialize, Serialize};

/// A single search hit, tagged by the level of the hierarchy it
/// matched at.
///
/// Serializes as `{"type": "course" | "module" | "topic", ...}` with
/// the ids needed to navigate to the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    /// Query matched a course code or name
    Course {
        course_id: u32,
        /// "<code> - <name>"
        title: String,
    },

    /// Query matched a module title
    Module {
        course_id: u32,
        module_id: u32,
        /// "<code> > <module title>"
        title: String,
    },

    /// Query matched both a topic title and its content body
    Topic {
        course_id: u32,
        module_id: u32,
        topic_id: u32,
        /// "<code> > <module title> > <topic title>"
        title: String,
    },
}

impl SearchResult {
    /// The display title of the hit
    pub fn title(&self) -> &str {
        match self {
            Self::Course { title, .. } | Self::Module { title, .. } | Self::Topic { title, .. } => {
                title
            }
        }
    }
}
