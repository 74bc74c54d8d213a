//! Intent Classifier Integration Tests

use std::sync::Arc;

use jira_assistant::services::assistant::{IntentClassifier, IntentDecision};
use jira_assistant_core::CompletionError;

use super::support::{not_creation, ScriptedCompletion};

fn classifier(completion: &Arc<ScriptedCompletion>) -> IntentClassifier {
    IntentClassifier::new(completion.clone())
}

#[tokio::test]
async fn test_creation_request_extracts_draft() {
    let completion = Arc::new(ScriptedCompletion::replying([r#"{
        "is_create_request": true,
        "summary": "fix the login bug",
        "description": "Fix the login bug reported by users",
        "priority": "High",
        "story_points": null,
        "due_date": null
    }"#]));

    let decision = classifier(&completion)
        .classify("create a task to fix the login bug, high priority")
        .await
        .unwrap();

    match decision {
        IntentDecision::CreateIssue(draft) => {
            assert!(draft.summary.to_lowercase().contains("fix the login bug"));
            assert_eq!(draft.priority, "High");
            assert!(!draft.description.is_empty());
            assert!(draft.story_points.is_none());
            assert!(draft.due_date.is_none());
        }
        other => panic!("expected CreateIssue, got {:?}", other),
    }
    // The assignment check never runs once creation is detected.
    assert_eq!(completion.call_count(), 1);
}

#[tokio::test]
async fn test_assignment_phrases_classify_as_bulk_assign() {
    let phrases = [
        "assign all issues to me",
        "take ownership of issues",
        "claim all issues",
        "assign tickets to me",
        "take all tickets",
    ];

    for phrase in phrases {
        let completion = Arc::new(ScriptedCompletion::replying([not_creation(), "yes".to_string()]));
        let decision = classifier(&completion).classify(phrase).await.unwrap();

        assert_eq!(decision, IntentDecision::BulkAssign, "phrase: {}", phrase);
        assert_eq!(completion.call_count(), 2);
        assert_eq!(completion.call(1).user, phrase);
    }
}

#[tokio::test]
async fn test_creation_check_precedes_assignment_check() {
    let completion = Arc::new(ScriptedCompletion::replying([not_creation(), "no".to_string()]));
    classifier(&completion).classify("what's overdue?").await.unwrap();

    let first = completion.call(0).system.unwrap_or_default();
    let second = completion.call(1).system.unwrap_or_default();
    assert!(first.contains("is_create_request"));
    assert!(second.contains("assign issues to themselves"));
}

#[tokio::test]
async fn test_malformed_creation_output_falls_through() {
    let completion = Arc::new(ScriptedCompletion::replying([
        "Sure, I can help with that!".to_string(),
        "no".to_string(),
    ]));

    let decision = classifier(&completion)
        .classify("What are my top priorities?")
        .await
        .unwrap();

    assert_eq!(decision, IntentDecision::ReadQuery);
    assert_eq!(completion.call_count(), 2);
}

#[tokio::test]
async fn test_malformed_creation_output_can_still_be_bulk_assign() {
    let completion = Arc::new(ScriptedCompletion::replying([
        "{not json".to_string(),
        "YES".to_string(),
    ]));

    let decision = classifier(&completion)
        .classify("assign all issues to me")
        .await
        .unwrap();
    assert_eq!(decision, IntentDecision::BulkAssign);
}

#[tokio::test]
async fn test_only_bare_yes_is_affirmative() {
    let completion = Arc::new(ScriptedCompletion::replying([
        not_creation(),
        "Yes, the user wants that.".to_string(),
    ]));

    let decision = classifier(&completion).classify("claim things").await.unwrap();
    assert_eq!(decision, IntentDecision::ReadQuery);
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let completion = Arc::new(ScriptedCompletion::new());
    completion.push(Err(CompletionError::Transport("connection reset".into())));

    let result = classifier(&completion).classify("anything").await;
    assert!(matches!(result, Err(CompletionError::Transport(_))));
    assert_eq!(completion.call_count(), 1);
}
