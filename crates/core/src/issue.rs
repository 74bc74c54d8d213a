//! Issue Data Types
//!
//! Wire-shaped records exchanged with an issue store. Field names follow the
//! tracker's REST representation (`issuetype`, `duedate`, `displayName`, ...)
//! so the same types deserialize straight from HTTP responses and from test
//! fixtures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A full issue record as returned by search or single-issue lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// The `fields` object of an issue.
///
/// Well-known system fields are typed; everything else (custom fields such as
/// story points) lands in `extra`, keyed by field identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuetype: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duedate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentPage>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl IssueFields {
    /// Description as plain text. Non-string descriptions (rich-text
    /// documents) are rendered as compact JSON.
    pub fn description_text(&self) -> String {
        match &self.description {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Look up a custom field by identifier, treating JSON null as absent.
    pub fn custom(&self, field_id: &str) -> Option<&Value> {
        self.extra.get(field_id).filter(|v| !v.is_null())
    }
}

/// Any `{ "name": ... }` reference: status, priority, issue type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl NamedRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A user reference as embedded in issues and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub body: Value,
}

/// A field definition from the tracker's field catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
}

/// A priority level defined in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLevel {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// The account the store credentials belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub account_id: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Required fields for phase one of issue creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
}

/// Identifiers returned by a successful create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub id: String,
    pub key: String,
}
