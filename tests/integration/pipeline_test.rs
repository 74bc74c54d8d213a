//! Assistant Session Integration Tests
//!
//! Full turns through `Assistant::process_query` with scripted
//! collaborators.

use std::sync::Arc;

use jira_assistant::services::assistant::{Assistant, AssistantOptions, RetrievalOutcome};
use jira_assistant_core::{CompletionError, StoreError};

use super::support::{issue, issues, not_creation, schema, ScriptedCompletion, ScriptedStore};

async fn session(store: &Arc<ScriptedStore>, completion: &Arc<ScriptedCompletion>) -> Assistant {
    Assistant::start(store.clone(), completion.clone(), AssistantOptions::default()).await
}

fn read_query_replies(filter: &str, answer: &str) -> Vec<String> {
    vec![
        not_creation(),
        "no".to_string(),
        filter.to_string(),
        answer.to_string(),
    ]
}

#[tokio::test]
async fn test_top_priorities_drops_self_assignment() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(vec![issue("SCRUM-3", "Highest")])));
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM" AND assignee = currentUser() AND priority = Highest ORDER BY priority DESC, updated DESC"#,
        "SCRUM-3: Work item SCRUM-3 (Highest priority, 3 points, To Do)",
    )));
    let mut assistant = session(&store, &completion).await;

    let reply = assistant.process_query("What are my top priorities?").await;

    assert_eq!(reply, "SCRUM-3: Work item SCRUM-3 (Highest priority, 3 points, To Do)");
    let filters = store.searched_filters();
    assert_eq!(filters.len(), 1);
    assert!(!filters[0].contains("currentUser()"));
    assert!(filters[0].starts_with(r#"project = "SCRUM""#));
    assert!(filters[0].ends_with("ORDER BY priority DESC, updated DESC"));
}

#[tokio::test]
async fn test_explicit_personal_question_keeps_self_assignment() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(2))));
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM" AND assignee = currentUser() ORDER BY priority DESC, updated DESC"#,
        "You have two issues.",
    )));
    let mut assistant = session(&store, &completion).await;

    assistant.process_query("What issues are assigned to me?").await;

    assert!(store.searched_filters()[0].contains("assignee = currentUser()"));
}

#[tokio::test]
async fn test_translator_prompt_embeds_schema() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(1))));
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM" ORDER BY priority DESC, updated DESC"#,
        "ok",
    )));
    let mut assistant = session(&store, &completion).await;
    assert_eq!(assistant.schema(), &schema());

    assistant.process_query("quick tasks for today").await;

    let system = completion.call(2).system.unwrap_or_default();
    assert!(system.contains("Story point estimate"));
    assert!(system.contains("Highest, High, Medium, Low, Lowest"));
    assert!(system.contains("project = \"SCRUM\""));
}

#[tokio::test]
async fn test_unguarded_filter_is_scoped_before_execution() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(1))));
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        "```\nstatus = \"In Progress\"\n```",
        "ok",
    )));
    let mut assistant = session(&store, &completion).await;

    assistant.process_query("what's in progress?").await;

    assert_eq!(
        store.searched_filters()[0],
        r#"project = "SCRUM" AND status = "In Progress" ORDER BY priority DESC, updated DESC"#
    );
}

#[tokio::test]
async fn test_similar_project_key_is_still_scoped() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(1))));
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUMX" AND status = Done OR assignee is EMPTY"#,
        "ok",
    )));
    let mut assistant = session(&store, &completion).await;

    assistant.process_query("what's done?").await;

    assert_eq!(
        store.searched_filters()[0],
        r#"project = "SCRUM" AND (project = "SCRUMX" AND status = Done OR assignee is EMPTY) ORDER BY priority DESC, updated DESC"#
    );
}

#[tokio::test]
async fn test_store_failure_is_reported_without_relaxation() {
    let store = Arc::new(
        ScriptedStore::new().then_search(Err(StoreError::network("connection refused"))),
    );
    let completion = Arc::new(ScriptedCompletion::replying([
        not_creation(),
        "no".to_string(),
        r#"project = "SCRUM" AND priority = Highest ORDER BY priority DESC, updated DESC"#.to_string(),
    ]));
    let mut assistant = session(&store, &completion).await;

    let reply = assistant.process_query("what's urgent?").await;

    assert!(reply.starts_with("Could not connect to JIRA"));
    assert_eq!(store.search_count(), 1);
    // classifier (2) + translator (1); the synthesizer is never asked
    assert_eq!(completion.call_count(), 3);
    assert!(matches!(
        assistant.last_outcome(),
        Some(RetrievalOutcome::Failed { .. })
    ));
}

#[tokio::test]
async fn test_relaxed_answer_mentions_strategy() {
    let store = Arc::new(
        ScriptedStore::new()
            .then_search(Ok(vec![]))
            .then_search(Ok(vec![]))
            .then_search(Ok(vec![issue("SCRUM-11", "Medium")])),
    );
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM" AND priority = Highest ORDER BY priority DESC, updated DESC"#,
        "Nothing Highest; SCRUM-11 is Medium.",
    )));
    let mut assistant = session(&store, &completion).await;

    let reply = assistant.process_query("any blockers?").await;

    assert_eq!(reply, "Nothing Highest; SCRUM-11 is Medium.");
    assert_eq!(store.search_count(), 3);
    assert!(completion.call(3).user.contains("Search strategy used: medium priority"));
}

#[tokio::test]
async fn test_creation_turn_creates_issue() {
    let store = Arc::new(ScriptedStore::new());
    let completion = Arc::new(ScriptedCompletion::replying([r#"```json
{"is_create_request": true, "summary": "fix the login bug", "description": "", "priority": "High", "story_points": 3, "due_date": null}
```"#]));
    let mut assistant = session(&store, &completion).await;

    let reply = assistant
        .process_query("create a task to fix the login bug, high priority")
        .await;

    assert!(reply.starts_with("Successfully created issue SCRUM-100"));
    assert!(reply.contains("**Priority:** High"));
    assert!(reply.contains("**Story Points:** 3"));
    let created = store.created.lock().unwrap();
    assert_eq!(created[0].summary, "fix the login bug");
    assert_eq!(created[0].description, "fix the login bug");
    assert_eq!(store.search_count(), 0);
}

#[tokio::test]
async fn test_bulk_assign_turn() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(3))).failing_assignment("SCRUM-1"));
    let completion = Arc::new(ScriptedCompletion::replying([not_creation(), "yes".to_string()]));
    let mut assistant = session(&store, &completion).await;

    let reply = assistant.process_query("assign all issues to me").await;

    assert_eq!(
        reply,
        "**Successfully assigned 2 issues**\nFailed to assign 1 issues\nFailed issues: SCRUM-1"
    );
}

#[tokio::test]
async fn test_model_failure_does_not_end_session() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(1))));
    let completion = Arc::new(ScriptedCompletion::new());
    completion.push(Err(CompletionError::Transport("timed out".into())));
    let mut assistant = session(&store, &completion).await;

    let first = assistant.process_query("anything?").await;
    assert!(first.contains("timed out"));

    for reply in read_query_replies(r#"project = "SCRUM""#, "one issue") {
        completion.push(Ok(reply));
    }
    let second = assistant.process_query("anything now?").await;
    assert_eq!(second, "one issue");
}

#[tokio::test]
async fn test_schema_failure_leaves_empty_snapshot() {
    let store = Arc::new(
        ScriptedStore::new()
            .with_schema_failure(StoreError::network("dns"))
            .then_search(Ok(issues(1))),
    );
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM""#,
        "fine",
    )));
    let mut assistant = session(&store, &completion).await;

    assert!(assistant.schema().is_empty());
    assert_eq!(assistant.process_query("status?").await, "fine");
}

#[tokio::test]
async fn test_issue_details_prefers_last_results() {
    let store = Arc::new(
        ScriptedStore::new()
            .then_search(Ok(issues(2)))
            .with_issue(issue("SCRUM-99", "Low")),
    );
    let completion = Arc::new(ScriptedCompletion::replying(read_query_replies(
        r#"project = "SCRUM""#,
        "two issues",
    )));
    let mut assistant = session(&store, &completion).await;
    assistant.process_query("list issues").await;

    let cached = assistant.issue_details("scrum-2").await.unwrap();
    assert_eq!(cached.key, "SCRUM-2");
    assert!(store.issue_lookups.lock().unwrap().is_empty());

    let fetched = assistant.issue_details("SCRUM-99").await.unwrap();
    assert_eq!(fetched.key, "SCRUM-99");

    let missing = assistant.issue_details("SCRUM-404").await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_blank_question_makes_no_calls() {
    let store = Arc::new(ScriptedStore::new());
    let completion = Arc::new(ScriptedCompletion::new());
    let mut assistant = session(&store, &completion).await;

    let reply = assistant.process_query("   ").await;
    assert!(reply.starts_with("Please ask"));
    assert_eq!(completion.call_count(), 0);
    assert_eq!(store.search_count(), 0);
}
