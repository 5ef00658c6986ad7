//! Search Engine Integration Tests
//!
//! Exercises traversal order, the topic title-and-body match rule,
//! and the result cap through the repository's public surface.

use coursemap::core::{ContentRepository, NewTopic, TopicPatch};
use coursemap::domain::SearchResult;
use coursemap::ledger::NoopLedger;
use tempfile::TempDir;

async fn open_repo() -> (ContentRepository, TempDir) {
    let temp = TempDir::new().unwrap();
    let repo = ContentRepository::with_ledger(temp.path().join("content"), Box::new(NoopLedger))
        .await
        .unwrap();
    (repo, temp)
}

#[tokio::test]
async fn test_course_match_on_code_or_name() {
    let (repo, _temp) = open_repo().await;
    repo.create_course("CS101", "Algorithms").await.unwrap();

    let results = repo.search("algo").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0],
        SearchResult::Course {
            course_id: 1,
            title: "CS101 - Algorithms".to_string(),
        }
    );

    // Code matches too, case-insensitively.
    let results = repo.search("cs101").await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_module_match_format() {
    let (repo, _temp) = open_repo().await;
    let course = repo.create_course("CS101", "Algorithms").await.unwrap();
    repo.create_module(course.id, "Graph Theory").await.unwrap();

    let results = repo.search("graph").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0],
        SearchResult::Module {
            course_id: 1,
            module_id: 1,
            title: "CS101 > Graph Theory".to_string(),
        }
    );
}

#[tokio::test]
async fn test_topic_requires_title_and_body_match() {
    let (repo, _temp) = open_repo().await;
    let course = repo.create_course("CS101", "Algorithms").await.unwrap();
    let module = repo.create_module(course.id, "Basics").await.unwrap();
    let topic = repo
        .create_topic(course.id, module.id, NewTopic::new("Algo Basics"))
        .await
        .unwrap();

    // The template body contains the title, so both sides match.
    let results = repo.search("algo").await.unwrap();
    assert!(results.iter().any(|r| matches!(
        r,
        SearchResult::Topic { topic_id, title, .. }
            if *topic_id == topic.id && title == "CS101 > Basics > Algo Basics"
    )));

    // Rewrite the body so it no longer contains the query: the title
    // still matches but the topic must disappear from the results.
    let patch = TopicPatch {
        content: Some("# Something else entirely\n".to_string()),
        completed: None,
    };
    repo.update_topic(course.id, module.id, topic.id, patch)
        .await
        .unwrap();

    let results = repo.search("algo").await.unwrap();
    assert!(!results
        .iter()
        .any(|r| matches!(r, SearchResult::Topic { .. })));
    // The course itself still matches on its name.
    assert!(results
        .iter()
        .any(|r| matches!(r, SearchResult::Course { .. })));
}

#[tokio::test]
async fn test_missing_body_file_is_no_match() {
    let (repo, temp) = open_repo().await;
    let course = repo.create_course("MA201", "Calculus").await.unwrap();
    let module = repo.create_module(course.id, "Limits").await.unwrap();
    repo.create_topic(course.id, module.id, NewTopic::new("Epsilon Delta"))
        .await
        .unwrap();

    let file = temp
        .path()
        .join("content")
        .join("courses")
        .join("ma201-calculus")
        .join("limits")
        .join("epsilon-delta.md");
    std::fs::remove_file(&file).unwrap();

    let results = repo.search("epsilon").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_results_come_back_in_traversal_order() {
    let (repo, _temp) = open_repo().await;
    let course = repo.create_course("CS101", "Sorting Survey").await.unwrap();
    let module = repo.create_module(course.id, "Sorting").await.unwrap();
    repo.create_topic(course.id, module.id, NewTopic::new("Sorting Networks"))
        .await
        .unwrap();

    let results = repo.search("sorting").await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], SearchResult::Course { .. }));
    assert!(matches!(results[1], SearchResult::Module { .. }));
    assert!(matches!(results[2], SearchResult::Topic { .. }));
}

#[tokio::test]
async fn test_results_are_capped_at_twenty() {
    let (repo, _temp) = open_repo().await;
    let course = repo.create_course("MISC", "Grab Bag").await.unwrap();
    let module = repo.create_module(course.id, "Items").await.unwrap();

    for i in 1..=25 {
        repo.create_topic(course.id, module.id, NewTopic::new(format!("Item {}", i)))
            .await
            .unwrap();
    }

    // "item" hits the module plus all 25 topics (template bodies
    // contain their titles); only the first 20 survive.
    let results = repo.search("item").await.unwrap();
    assert_eq!(results.len(), 20);
    assert!(matches!(results[0], SearchResult::Module { .. }));
}

#[tokio::test]
async fn test_no_match_returns_empty() {
    let (repo, _temp) = open_repo().await;
    repo.create_course("CS101", "Algorithms").await.unwrap();

    let results = repo.search("quantum").await.unwrap();
    assert!(results.is_empty());
}
