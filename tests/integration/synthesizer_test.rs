//! Response Synthesizer Integration Tests

use std::sync::Arc;

use jira_assistant::services::assistant::{
    FilterExpression, RelaxationRung, ResponseSynthesizer, RetrievalOutcome,
};
use jira_assistant_core::StoreError;

use super::support::{issues, schema, ScriptedCompletion};

fn found(count: usize, rung: RelaxationRung) -> RetrievalOutcome {
    RetrievalOutcome::Found {
        issues: issues(count),
        filter: FilterExpression::new(r#"project = "SCRUM" AND priority in (Highest, High)"#),
        rung,
        original: FilterExpression::new(r#"project = "SCRUM" AND priority = Highest"#),
    }
}

#[tokio::test]
async fn test_context_holds_at_most_twenty_issues() {
    let completion = Arc::new(ScriptedCompletion::replying(["SCRUM-1: Work item (High, To Do)"]));
    let synthesizer = ResponseSynthesizer::new(completion.clone());

    let reply = synthesizer
        .synthesize("what's hot?", &found(30, RelaxationRung::Original), &schema())
        .await
        .unwrap();

    assert_eq!(reply, "SCRUM-1: Work item (High, To Do)");
    let prompt = completion.call(0).user;
    assert_eq!(prompt.matches("\"key\":").count(), 20);
    assert!(prompt.contains("\"SCRUM-20\""));
    assert!(!prompt.contains("\"SCRUM-21\""));
    // Story points are resolved through the schema's field identifier.
    assert!(prompt.contains("\"storyPoints\": 3"));
}

#[tokio::test]
async fn test_broadened_search_is_disclosed() {
    let completion = Arc::new(ScriptedCompletion::replying(["ok"]));
    let synthesizer = ResponseSynthesizer::new(completion.clone());

    synthesizer
        .synthesize("top work?", &found(2, RelaxationRung::MediumOrAbove), &schema())
        .await
        .unwrap();

    let call = completion.call(0);
    assert!(call.user.contains("Search strategy used: medium priority"));
    assert!(call.user.contains("broadened"));
    assert!(call.system.unwrap_or_default().contains("2-3 sentences"));
}

#[tokio::test]
async fn test_exhausted_outcome_asks_for_explanation() {
    let completion = Arc::new(ScriptedCompletion::replying(["Nothing is overdue; try ..."]));
    let synthesizer = ResponseSynthesizer::new(completion.clone());
    let original = FilterExpression::new(
        r#"project = "SCRUM" AND duedate <= now() ORDER BY priority DESC, updated DESC"#,
    );

    let reply = synthesizer
        .synthesize(
            "anything overdue?",
            &RetrievalOutcome::Exhausted {
                original: original.clone(),
            },
            &schema(),
        )
        .await
        .unwrap();

    assert!(reply.starts_with("Nothing is overdue"));
    let call = completion.call(0);
    assert!(call.user.contains("anything overdue?"));
    assert!(call.user.contains(original.as_str()));
    assert!(call.system.unwrap_or_default().contains("no matching issues"));
}

#[tokio::test]
async fn test_failed_outcome_skips_model() {
    let completion = Arc::new(ScriptedCompletion::new());
    let synthesizer = ResponseSynthesizer::new(completion.clone());

    let reply = synthesizer
        .synthesize(
            "anything",
            &RetrievalOutcome::Failed {
                filter: FilterExpression::new("project = SCRUM"),
                error: StoreError::Authentication("HTTP 401".into()),
            },
            &schema(),
        )
        .await
        .unwrap();

    assert!(reply.starts_with("Could not connect to JIRA"));
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn test_custom_context_limit() {
    let completion = Arc::new(ScriptedCompletion::replying(["ok"]));
    let synthesizer = ResponseSynthesizer::new(completion.clone()).with_context_limit(5);

    synthesizer
        .synthesize("q", &found(12, RelaxationRung::Original), &schema())
        .await
        .unwrap();

    assert_eq!(completion.call(0).user.matches("\"key\":").count(), 5);
}
