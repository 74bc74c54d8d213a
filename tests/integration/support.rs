//! Scripted collaborators
//!
//! `ScriptedStore` and `ScriptedCompletion` replay queued results in order
//! and record every call so tests can assert on call counts and arguments.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use jira_assistant::models::schema::{
    SchemaSnapshot, DUE_DATE_FIELD, PRIORITY_FIELD, STORY_POINTS_FIELD,
};
use jira_assistant_core::{
    CompletionError, CompletionResult, CompletionService, CreatedIssue, CurrentUser,
    FieldDefinition, IssueRecord, IssueStore, NewIssue, PriorityLevel, StoreError, StoreResult,
};
use serde_json::{json, Map, Value};

pub const STORY_POINTS_ID: &str = "customfield_10016";

// ============================================================================
// Fixtures
// ============================================================================

pub fn issue(key: &str, priority: &str) -> IssueRecord {
    serde_json::from_value(json!({
        "id": key.trim_start_matches("SCRUM-"),
        "key": key,
        "fields": {
            "summary": format!("Work item {}", key),
            "status": {"name": "To Do"},
            "priority": {"name": priority},
            "issuetype": {"name": "Task"},
            "created": "2026-10-01T09:00:00.000+0000",
            "updated": "2026-10-02T09:00:00.000+0000",
            STORY_POINTS_ID: 3
        }
    }))
    .expect("valid issue fixture")
}

pub fn issues(count: usize) -> Vec<IssueRecord> {
    (1..=count).map(|n| issue(&format!("SCRUM-{}", n), "High")).collect()
}

pub fn field_definitions() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition { id: "summary".into(), name: "Summary".into() },
        FieldDefinition { id: "priority".into(), name: PRIORITY_FIELD.into() },
        FieldDefinition { id: STORY_POINTS_ID.into(), name: STORY_POINTS_FIELD.into() },
        FieldDefinition { id: "duedate".into(), name: DUE_DATE_FIELD.into() },
    ]
}

pub fn priority_levels() -> Vec<PriorityLevel> {
    ["Highest", "High", "Medium", "Low", "Lowest"]
        .iter()
        .enumerate()
        .map(|(i, name)| PriorityLevel {
            id: (i + 1).to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn schema() -> SchemaSnapshot {
    SchemaSnapshot::new(field_definitions(), priority_levels())
}

pub fn not_creation() -> String {
    r#"{"is_create_request": false}"#.to_string()
}

// ============================================================================
// ScriptedStore
// ============================================================================

pub struct ScriptedStore {
    search_results: Mutex<VecDeque<StoreResult<Vec<IssueRecord>>>>,
    pub searches: Mutex<Vec<String>>,
    schema_fields: StoreResult<Vec<FieldDefinition>>,
    priorities: StoreResult<Vec<PriorityLevel>>,
    create_result: StoreResult<CreatedIssue>,
    pub created: Mutex<Vec<NewIssue>>,
    update_result: StoreResult<()>,
    pub updates: Mutex<Vec<(String, Map<String, Value>)>>,
    failing_assignments: HashSet<String>,
    pub assignments: Mutex<Vec<(String, String)>>,
    current_user: StoreResult<CurrentUser>,
    pub current_user_calls: Mutex<usize>,
    known_issues: HashMap<String, IssueRecord>,
    pub issue_lookups: Mutex<Vec<String>>,
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self {
            search_results: Mutex::new(VecDeque::new()),
            searches: Mutex::new(Vec::new()),
            schema_fields: Ok(field_definitions()),
            priorities: Ok(priority_levels()),
            create_result: Ok(CreatedIssue {
                id: "10100".into(),
                key: "SCRUM-100".into(),
            }),
            created: Mutex::new(Vec::new()),
            update_result: Ok(()),
            updates: Mutex::new(Vec::new()),
            failing_assignments: HashSet::new(),
            assignments: Mutex::new(Vec::new()),
            current_user: Ok(CurrentUser {
                account_id: "acct-123".into(),
                email_address: Some("dev@example.com".into()),
                display_name: Some("Dev".into()),
            }),
            current_user_calls: Mutex::new(0),
            known_issues: HashMap::new(),
            issue_lookups: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next search. Searches past the end of the
    /// queue return no issues.
    pub fn then_search(self, result: StoreResult<Vec<IssueRecord>>) -> Self {
        self.search_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_schema_failure(mut self, error: StoreError) -> Self {
        self.schema_fields = Err(error);
        self
    }

    pub fn with_create_result(mut self, result: StoreResult<CreatedIssue>) -> Self {
        self.create_result = result;
        self
    }

    pub fn with_update_result(mut self, result: StoreResult<()>) -> Self {
        self.update_result = result;
        self
    }

    pub fn failing_assignment(mut self, key: &str) -> Self {
        self.failing_assignments.insert(key.to_string());
        self
    }

    pub fn with_current_user(mut self, result: StoreResult<CurrentUser>) -> Self {
        self.current_user = result;
        self
    }

    pub fn with_issue(mut self, issue: IssueRecord) -> Self {
        self.known_issues.insert(issue.key.clone(), issue);
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn searched_filters(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueStore for ScriptedStore {
    async fn search(&self, filter: &str) -> StoreResult<Vec<IssueRecord>> {
        self.searches.lock().unwrap().push(filter.to_string());
        self.search_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_issue(&self, key: &str) -> StoreResult<IssueRecord> {
        self.issue_lookups.lock().unwrap().push(key.to_string());
        self.known_issues
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Issue {} does not exist", key)))
    }

    async fn get_schema_fields(&self) -> StoreResult<Vec<FieldDefinition>> {
        self.schema_fields.clone()
    }

    async fn get_priority_levels(&self) -> StoreResult<Vec<PriorityLevel>> {
        self.priorities.clone()
    }

    async fn create_issue(&self, issue: &NewIssue) -> StoreResult<CreatedIssue> {
        self.created.lock().unwrap().push(issue.clone());
        self.create_result.clone()
    }

    async fn update_issue_fields(&self, key: &str, fields: Map<String, Value>) -> StoreResult<()> {
        self.updates.lock().unwrap().push((key.to_string(), fields));
        self.update_result.clone()
    }

    async fn set_assignee(&self, key: &str, account_id: &str) -> StoreResult<()> {
        self.assignments
            .lock()
            .unwrap()
            .push((key.to_string(), account_id.to_string()));
        if self.failing_assignments.contains(key) {
            Err(StoreError::rejected(400, "user cannot be assigned"))
        } else {
            Ok(())
        }
    }

    async fn get_current_user(&self) -> StoreResult<CurrentUser> {
        *self.current_user_calls.lock().unwrap() += 1;
        self.current_user.clone()
    }
}

// ============================================================================
// ScriptedCompletion
// ============================================================================

/// One recorded completion call
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub system: Option<String>,
    pub user: String,
}

#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<CompletionResult<String>>>,
    pub calls: Mutex<Vec<CompletionCall>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let completion = Self::new();
        for reply in replies {
            completion.push(Ok(reply.into()));
        }
        completion
    }

    pub fn push(&self, reply: CompletionResult<String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call(&self, index: usize) -> CompletionCall {
        self.calls.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, system: Option<&str>, user: &str) -> CompletionResult<String> {
        self.calls.lock().unwrap().push(CompletionCall {
            system: system.map(str::to_string),
            user: user.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Api("no scripted reply left".into())))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
