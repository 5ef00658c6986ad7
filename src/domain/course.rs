//! Course, module, and topic records.
//!
//! A course owns an ordered list of modules, each owning an ordered
//! list of topics. Topic body text lives in a separate markdown file
//! referenced by `Topic::file`; the records here only carry structure.
//!
//! Ids are allocated from per-scope persisted counters. Records written
//! before the counters existed fall back to `len + 1`, which keeps the
//! id sequence they were created under.

use serde::{Deserialize, Serialize};

/// A course: the outermost level of the content hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Globally unique identifier, assigned at creation
    pub id: u32,

    /// Short course code (e.g. "CS101")
    pub code: String,

    /// Human-readable course name
    pub name: String,

    /// Directory name under the courses root
    pub slug: String,

    /// Completion percentage. Derived from topics; recomputed on every
    /// read and never trusted from the stored value.
    #[serde(default)]
    pub progress: u8,

    /// Modules in creation order
    #[serde(default)]
    pub modules: Vec<Module>,

    /// Counter for the next module id
    #[serde(default)]
    pub next_module_id: u32,
}

impl Course {
    /// Create a new course with no modules
    pub fn new(id: u32, code: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            slug: slug.into(),
            progress: 0,
            modules: Vec::new(),
            next_module_id: 0,
        }
    }

    /// Allocate the next module id and advance the counter
    pub fn allocate_module_id(&mut self) -> u32 {
        let id = self.next_module_id.max(self.modules.len() as u32 + 1);
        self.next_module_id = id + 1;
        id
    }

    /// Find a module by id
    pub fn module(&self, module_id: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Find a module by id, mutably
    pub fn module_mut(&mut self, module_id: u32) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == module_id)
    }

    /// Completion percentage over all topics in the course.
    ///
    /// Every topic counts equally; the result is the floor of
    /// `completed / total * 100`, or 0 for a course with no topics.
    pub fn progress(&self) -> u8 {
        let total: usize = self.modules.iter().map(|m| m.topics.len()).sum();
        if total == 0 {
            return 0;
        }

        let completed = self
            .modules
            .iter()
            .flat_map(|m| &m.topics)
            .filter(|t| t.completed)
            .count();

        (completed * 100 / total) as u8
    }
}

/// A module within a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Identifier, unique within the parent course
    pub id: u32,

    /// Module title
    pub title: String,

    /// Directory name under the course directory
    pub slug: String,

    /// Present for interface compatibility; no operation sets it
    #[serde(default)]
    pub completed: bool,

    /// Topics in creation order
    #[serde(default)]
    pub topics: Vec<Topic>,

    /// Counter for the next topic id
    #[serde(default)]
    pub next_topic_id: u32,
}

impl Module {
    /// Create a new module with no topics
    pub fn new(id: u32, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            completed: false,
            topics: Vec::new(),
            next_topic_id: 0,
        }
    }

    /// Allocate the next topic id and advance the counter
    pub fn allocate_topic_id(&mut self) -> u32 {
        let id = self.next_topic_id.max(self.topics.len() as u32 + 1);
        self.next_topic_id = id + 1;
        id
    }

    /// Find a topic by id
    pub fn topic(&self, topic_id: u32) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    /// Find a topic by id, mutably
    pub fn topic_mut(&mut self, topic_id: u32) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|t| t.id == topic_id)
    }
}

/// A topic within a module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Identifier, unique within the parent module
    pub id: u32,

    /// Topic title
    pub title: String,

    /// File stem of the content file
    pub slug: String,

    /// Content file path relative to the course directory
    /// ("<module-slug>/<topic-slug>.md")
    pub file: String,

    /// Whether the topic has been completed
    #[serde(default)]
    pub completed: bool,

    /// Study priority
    #[serde(default)]
    pub priority: Priority,

    /// Estimated study time in minutes
    #[serde(default = "default_time")]
    pub time: u32,

    /// Present for interface compatibility; always false
    #[serde(default)]
    pub locked: bool,
}

fn default_time() -> u32 {
    15
}

/// Study priority of a topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,

    /// Default priority
    #[default]
    Medium,

    /// High priority
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => anyhow::bail!("Unknown priority: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: u32, completed: bool) -> Topic {
        Topic {
            id,
            title: format!("Topic {}", id),
            slug: format!("topic-{}", id),
            file: format!("m/topic-{}.md", id),
            completed,
            priority: Priority::Medium,
            time: 15,
            locked: false,
        }
    }

    #[test]
    fn test_progress_empty_course() {
        let course = Course::new(1, "CS101", "Algorithms", "cs101-algorithms");
        assert_eq!(course.progress(), 0);
    }

    #[test]
    fn test_progress_counts_all_modules() {
        let mut course = Course::new(1, "CS101", "Algorithms", "cs101-algorithms");

        let mut m1 = Module::new(1, "Sorting", "sorting");
        m1.topics.push(topic(1, true));
        m1.topics.push(topic(2, false));

        let mut m2 = Module::new(2, "Graphs", "graphs");
        m2.topics.push(topic(1, true));

        course.modules.push(m1);
        course.modules.push(m2);

        // 2 of 3 completed, floored
        assert_eq!(course.progress(), 66);
    }

    #[test]
    fn test_progress_all_completed() {
        let mut course = Course::new(1, "CS101", "Algorithms", "cs101-algorithms");
        let mut module = Module::new(1, "Sorting", "sorting");
        module.topics.push(topic(1, true));
        module.topics.push(topic(2, true));
        course.modules.push(module);

        assert_eq!(course.progress(), 100);
    }

    #[test]
    fn test_module_id_allocation_is_monotonic() {
        let mut course = Course::new(1, "CS101", "Algorithms", "cs101-algorithms");

        assert_eq!(course.allocate_module_id(), 1);
        assert_eq!(course.allocate_module_id(), 2);
        assert_eq!(course.next_module_id, 3);
    }

    #[test]
    fn test_module_id_allocation_without_counter() {
        // Records written before the counter existed deserialize with
        // next_module_id = 0 and must still allocate count + 1.
        let mut course = Course::new(1, "CS101", "Algorithms", "cs101-algorithms");
        course.modules.push(Module::new(1, "Sorting", "sorting"));
        course.next_module_id = 0;

        assert_eq!(course.allocate_module_id(), 2);
    }

    #[test]
    fn test_topic_defaults_from_json() {
        let json = r#"{"id":1,"title":"T","slug":"t","file":"m/t.md"}"#;
        let topic: Topic = serde_json::from_str(json).unwrap();

        assert!(!topic.completed);
        assert_eq!(topic.priority, Priority::Medium);
        assert_eq!(topic.time, 15);
        assert!(!topic.locked);
    }

    #[test]
    fn test_priority_round_trip() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());

        let json = serde_json::to_string(&Priority::Low).unwrap();
        assert_eq!(json, "\"low\"");
    }
}
