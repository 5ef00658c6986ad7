//! Substring search over the whole content hierarchy.
//!
//! The engine walks the index in stored order, then each course's
//! modules and topics in stored order, so results come back in
//! traversal order rather than ranked. Courses match on code or name
//! and modules on title. Topics are stricter: the query must appear in
//! both the topic title and the content file body.

use anyhow::Result;

use crate::domain::SearchResult;
use crate::store::{ContentFileStore, CourseMetadataStore, Index};

/// Maximum number of results returned per query
pub const MAX_RESULTS: usize = 20;

/// Read-only search over index, metadata, and content files
#[derive(Debug, Clone)]
pub struct SearchEngine {
    meta: CourseMetadataStore,
    content: ContentFileStore,
}

impl SearchEngine {
    /// Create an engine over the given stores
    pub fn new(meta: CourseMetadataStore, content: ContentFileStore) -> Self {
        Self { meta, content }
    }

    /// Find up to [`MAX_RESULTS`] case-insensitive substring matches.
    ///
    /// Courses whose metadata record is missing are skipped; a missing
    /// content file simply never matches.
    pub async fn search(&self, index: &Index, query: &str) -> Result<Vec<SearchResult>> {
        let needle = query.to_lowercase();
        let mut results = Vec::new();

        for course_ref in &index.courses {
            if results.len() >= MAX_RESULTS {
                break;
            }

            let Some(course) = self.meta.load(&course_ref.slug).await? else {
                continue;
            };

            if course.code.to_lowercase().contains(&needle)
                || course.name.to_lowercase().contains(&needle)
            {
                results.push(SearchResult::Course {
                    course_id: course.id,
                    title: format!("{} - {}", course.code, course.name),
                });
            }

            for module in &course.modules {
                if module.title.to_lowercase().contains(&needle) {
                    results.push(SearchResult::Module {
                        course_id: course.id,
                        module_id: module.id,
                        title: format!("{} > {}", course.code, module.title),
                    });
                }

                for topic in &module.topics {
                    if !topic.title.to_lowercase().contains(&needle) {
                        continue;
                    }

                    // Title alone is not enough; the body must match too.
                    let body = self.content.read(&course_ref.slug, &topic.file).await?;
                    if body.to_lowercase().contains(&needle) {
                        results.push(SearchResult::Topic {
                            course_id: course.id,
                            module_id: module.id,
                            topic_id: topic.id,
                            title: format!(
                                "{} > {} > {}",
                                course.code, module.title, topic.title
                            ),
                        });
                    }
                }
            }
        }

        results.truncate(MAX_RESULTS);
        Ok(results)
    }
}
