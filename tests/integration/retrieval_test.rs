//! Adaptive Retrieval Integration Tests

use std::sync::Arc;

use jira_assistant::services::assistant::{
    AdaptiveRetrievalEngine, FilterExpression, RelaxationRung, RetrievalOutcome,
};
use jira_assistant_core::StoreError;

use super::support::{issue, issues, ScriptedStore};

const HIGHEST: &str = r#"project = "SCRUM" AND priority = Highest AND status = "To Do" ORDER BY priority DESC, updated DESC"#;
const NO_HIGHEST: &str = r#"project = "SCRUM" AND status = "To Do" ORDER BY priority DESC, updated DESC"#;

fn engine(store: &Arc<ScriptedStore>) -> AdaptiveRetrievalEngine {
    AdaptiveRetrievalEngine::new(store.clone())
}

#[tokio::test]
async fn test_filter_without_highest_makes_one_call() {
    let store = Arc::new(ScriptedStore::new());
    let filter = FilterExpression::new(NO_HIGHEST);

    let (outcome, log) = engine(&store).retrieve(&filter).await;

    assert_eq!(store.search_count(), 1);
    assert_eq!(log.attempts.len(), 1);
    assert_eq!(outcome, RetrievalOutcome::Exhausted { original: filter });
}

#[tokio::test]
async fn test_exhaustion_carries_original_filter() {
    let store = Arc::new(ScriptedStore::new());
    let filter = FilterExpression::new(HIGHEST);

    let (outcome, log) = engine(&store).retrieve(&filter).await;

    assert_eq!(store.search_count(), 4);
    assert_eq!(log.empty_attempts_count(), 4);
    match outcome {
        RetrievalOutcome::Exhausted { original } => assert_eq!(original.as_str(), HIGHEST),
        other => panic!("expected Exhausted, got {:?}", other),
    }

    let filters = store.searched_filters();
    assert_eq!(filters[0], HIGHEST);
    assert!(filters[1].contains("priority in (Highest, High)"));
    assert!(filters[2].contains("priority in (Highest, High, Medium)"));
    assert!(!filters[3].to_lowercase().contains("priority ="));
    assert!(!filters[3].contains("AND  AND"));
    assert!(filters[3].ends_with("ORDER BY priority DESC, updated DESC"));
}

#[tokio::test]
async fn test_short_circuits_at_first_non_empty_rung() {
    let store = Arc::new(
        ScriptedStore::new()
            .then_search(Ok(vec![]))
            .then_search(Ok(vec![issue("SCRUM-7", "High"), issue("SCRUM-8", "Highest")])),
    );
    let filter = FilterExpression::new(HIGHEST);

    let (outcome, log) = engine(&store).retrieve(&filter).await;

    assert_eq!(store.search_count(), 2);
    assert_eq!(log.successful_rung, Some(RelaxationRung::HighOrAbove));
    match outcome {
        RetrievalOutcome::Found {
            issues,
            rung,
            filter: used,
            original,
        } => {
            assert_eq!(issues.len(), 2);
            assert_eq!(issues[0].key, "SCRUM-7");
            assert_eq!(rung, RelaxationRung::HighOrAbove);
            assert!(used.as_str().contains("priority in (Highest, High)"));
            assert_eq!(original.as_str(), HIGHEST);
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_original_filter_hit_is_not_broadened() {
    let store = Arc::new(ScriptedStore::new().then_search(Ok(issues(3))));
    let (outcome, _) = engine(&store)
        .retrieve(&FilterExpression::new(HIGHEST))
        .await;

    assert_eq!(store.search_count(), 1);
    assert!(matches!(
        outcome,
        RetrievalOutcome::Found { rung: RelaxationRung::Original, .. }
    ));
}

#[tokio::test]
async fn test_transport_failure_on_first_attempt_is_hard_failure() {
    let store = Arc::new(
        ScriptedStore::new().then_search(Err(StoreError::network("connection refused"))),
    );
    let filter = FilterExpression::new(HIGHEST);

    let (outcome, log) = engine(&store).retrieve(&filter).await;

    assert_eq!(store.search_count(), 1);
    assert!(log.attempts[0].error_message.is_some());
    match outcome {
        RetrievalOutcome::Failed { error, filter: failed } => {
            assert!(matches!(error, StoreError::Network(_)));
            assert_eq!(failed.as_str(), HIGHEST);
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_on_later_rung_stops_the_ladder() {
    let store = Arc::new(
        ScriptedStore::new()
            .then_search(Ok(vec![]))
            .then_search(Err(StoreError::rejected(400, "Error in the JQL Query"))),
    );

    let (outcome, _) = engine(&store)
        .retrieve(&FilterExpression::new(HIGHEST))
        .await;

    assert_eq!(store.search_count(), 2);
    assert!(matches!(outcome, RetrievalOutcome::Failed { .. }));
}
