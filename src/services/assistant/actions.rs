//! Action Executors
//!
//! Write operations against the issue store. Both executors catch every
//! store failure at this boundary: creation reports a failure string, bulk
//! assignment reports partial success.

use std::collections::BTreeMap;
use std::sync::Arc;

use jira_assistant_core::{IssueRecord, IssueStore, NewIssue};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use super::classifier::IssueDraft;
use super::filter::FilterExpression;
use crate::models::schema::{SchemaSnapshot, DUE_DATE_FIELD, PRIORITY_FIELD, STORY_POINTS_FIELD};

/// Outcome of one bulk assignment run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAssignResult {
    pub success: bool,
    pub count: usize,
    pub failed_count: usize,
    pub failed_issues: Vec<String>,
    pub message: String,
}

impl BulkAssignResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            failed_count: 0,
            failed_issues: Vec::new(),
            message: message.into(),
        }
    }

    /// Render for display.
    pub fn to_message(&self) -> String {
        if !self.success {
            return format!("Failed to assign issues: {}", self.message);
        }

        let mut out = format!("**{}**", self.message);
        if self.failed_count > 0 {
            out.push_str(&format!("\nFailed to assign {} issues", self.failed_count));
            if !self.failed_issues.is_empty() {
                out.push_str(&format!("\nFailed issues: {}", self.failed_issues.join(", ")));
            }
        }
        out
    }
}

/// Optional fields that phase two managed to set
#[derive(Debug, Default)]
struct AppliedFields {
    priority: Option<String>,
    story_points: Option<f64>,
    due_date: Option<String>,
}

pub struct ActionExecutor {
    store: Arc<dyn IssueStore>,
    project_key: String,
}

impl ActionExecutor {
    pub fn new(store: Arc<dyn IssueStore>, project_key: impl Into<String>) -> Self {
        Self {
            store,
            project_key: project_key.into(),
        }
    }

    /// Create an issue in two phases: required fields first, then a
    /// best-effort update of priority, story points and due date.
    pub async fn create_issue(
        &self,
        draft: &IssueDraft,
        issue_type: &str,
        schema: &SchemaSnapshot,
    ) -> String {
        info!(summary = %draft.summary, issue_type, "creating issue");

        let new_issue = NewIssue {
            project: self.project_key.clone(),
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            issue_type: issue_type.to_string(),
        };

        let created = match self.store.create_issue(&new_issue).await {
            Ok(created) => created,
            Err(e) => {
                error!(error = %e, "issue creation failed");
                return format!("Failed to create issue: {}", e);
            }
        };
        info!(key = %created.key, "created issue");

        let (fields, pending) = optional_field_updates(draft, schema);
        let applied = if fields.is_empty() {
            AppliedFields::default()
        } else {
            match self.store.update_issue_fields(&created.key, fields).await {
                Ok(()) => {
                    debug!(key = %created.key, "optional fields updated");
                    pending
                }
                Err(e) => {
                    warn!(key = %created.key, error = %e, "could not set optional fields, continuing");
                    AppliedFields::default()
                }
            }
        };

        let priority = applied
            .priority
            .as_deref()
            .or_else(|| schema.resolve_priority(&draft.priority))
            .unwrap_or(&draft.priority);
        let mut message = format!(
            "Successfully created issue {}:\n\n**Summary:** {}\n**Priority:** {}",
            created.key, draft.summary, priority
        );
        if let Some(points) = applied.story_points {
            message.push_str(&format!("\n**Story Points:** {}", format_points(points)));
        }
        if let Some(due) = applied.due_date {
            message.push_str(&format!("\n**Due Date:** {}", due));
        }
        message
    }

    /// Assign every issue matching `filter` to the caller, one call per
    /// issue. Failures on individual issues are collected.
    pub async fn bulk_assign(&self, filter: &FilterExpression) -> BulkAssignResult {
        let filter = filter.with_guards(&self.project_key);
        info!(filter = %filter, "bulk assigning issues");

        let user = match self.store.get_current_user().await {
            Ok(user) if !user.account_id.is_empty() => user,
            Ok(_) => return BulkAssignResult::failure("Could not get user account ID"),
            Err(e) => {
                error!(error = %e, "could not resolve current user");
                return BulkAssignResult::failure(format!("Failed to get user info: {}", e));
            }
        };
        debug!(account_id = %user.account_id, "resolved current user");

        let issues = match self.store.search(filter.as_str()).await {
            Ok(issues) => issues,
            Err(e) => {
                error!(error = %e, "could not search issues to assign");
                return BulkAssignResult::failure(format!("Failed to search issues: {}", e));
            }
        };

        if issues.is_empty() {
            info!("no issues found matching the filter");
            return BulkAssignResult {
                success: true,
                count: 0,
                failed_count: 0,
                failed_issues: Vec::new(),
                message: "No issues found to assign".to_string(),
            };
        }

        info!(count = issues.len(), "found issues to assign");
        for (priority, count) in priority_distribution(&issues) {
            info!(priority = %priority, count, "priority distribution");
        }

        let mut assigned = 0;
        let mut failed_issues = Vec::new();
        for issue in &issues {
            match self.store.set_assignee(&issue.key, &user.account_id).await {
                Ok(()) => {
                    assigned += 1;
                    debug!(key = %issue.key, "assigned");
                }
                Err(e) => {
                    warn!(key = %issue.key, error = %e, "failed to assign issue");
                    failed_issues.push(issue.key.clone());
                }
            }
        }

        info!(assigned, failed = failed_issues.len(), "bulk assign complete");
        BulkAssignResult {
            success: true,
            count: assigned,
            failed_count: failed_issues.len(),
            failed_issues,
            message: format!("Successfully assigned {} issues", assigned),
        }
    }
}

/// Build the phase-two field map. Fields missing from the snapshot are
/// skipped; the returned `AppliedFields` describes what the map sets.
fn optional_field_updates(
    draft: &IssueDraft,
    schema: &SchemaSnapshot,
) -> (Map<String, Value>, AppliedFields) {
    let mut fields = Map::new();
    let mut applied = AppliedFields::default();

    if let Some(id) = schema.field_id(PRIORITY_FIELD) {
        match schema.resolve_priority(&draft.priority) {
            Some(name) => {
                fields.insert(id.to_string(), json!({ "name": name }));
                applied.priority = Some(name.to_string());
            }
            None if schema.priority_names().is_empty() => {
                fields.insert(id.to_string(), json!({ "name": draft.priority }));
                applied.priority = Some(draft.priority.clone());
            }
            None => warn!(priority = %draft.priority, "unknown priority, leaving default"),
        }
    }

    if let Some(points) = draft.story_points {
        match schema.field_id(STORY_POINTS_FIELD) {
            Some(id) => {
                fields.insert(id.to_string(), json!(points));
                applied.story_points = Some(points);
            }
            None => debug!("no story point field, skipping"),
        }
    }

    if let Some(due) = &draft.due_date {
        match schema.field_id(DUE_DATE_FIELD) {
            Some(id) => {
                fields.insert(id.to_string(), json!(due));
                applied.due_date = Some(due.clone());
            }
            None => debug!("no due date field, skipping"),
        }
    }

    (fields, applied)
}

fn priority_distribution(issues: &[IssueRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        let name = issue
            .fields
            .priority
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "None".to_string());
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        points.to_string()
    }
}
