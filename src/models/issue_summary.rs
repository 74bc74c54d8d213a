//! Issue Summary
//!
//! The projection of an issue that is shown to the language model.
//! Timestamps stay as the raw strings the tracker sent.

use jira_assistant_core::IssueRecord;
use serde::Serialize;
use serde_json::Value;

/// Assignee display value for unassigned issues
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub issue_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
    pub created: String,
    pub updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl IssueSummary {
    /// Project a record. `story_points_field` is the identifier of the
    /// story point field, when the tracker defines one.
    pub fn from_record(record: &IssueRecord, story_points_field: Option<&str>) -> Self {
        let fields = &record.fields;
        let name_of = |r: &Option<jira_assistant_core::NamedRef>| {
            r.as_ref().map(|n| n.name.clone()).unwrap_or_default()
        };

        Self {
            key: record.key.clone(),
            summary: fields.summary.clone().unwrap_or_default(),
            status: name_of(&fields.status),
            priority: name_of(&fields.priority),
            assignee: fields
                .assignee
                .as_ref()
                .map(|a| a.display_name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            issue_type: name_of(&fields.issuetype),
            story_points: story_points_field
                .and_then(|id| fields.custom(id))
                .and_then(numeric_value),
            created: fields.created.clone().unwrap_or_default(),
            updated: fields.updated.clone().unwrap_or_default(),
            due_date: fields.duedate.clone(),
        }
    }
}

/// Numbers arrive as JSON numbers or, from some field types, strings.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
