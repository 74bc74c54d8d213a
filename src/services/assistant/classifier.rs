//! Intent Classifier
//!
//! Decides whether a question asks to create an issue, to bulk-assign
//! unassigned issues, or simply to read. Two completion calls are made in a
//! fixed order: the creation check first, then the assignment check. A
//! creation reply that cannot be parsed counts as "not a creation request".

use std::sync::Arc;

use jira_assistant_core::{CompletionResult, CompletionService};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::text::extract_json_from_response;
use crate::models::issue_summary::numeric_value;

/// Priority used when a creation request does not name one
pub const DEFAULT_PRIORITY: &str = "Medium";

// ============================================================================
// Prompts
// ============================================================================

const CREATION_CHECK_PROMPT: &str = r#"You are a JIRA query analyzer. Decide whether the user's message asks to create a new task, ticket, or issue.

Typical phrasings:
- "create a new task"
- "add a new task"
- "create a ticket" / "add a ticket"
- "create an issue" / "add an issue"

If it is a creation request, reply with this JSON:
{
    "is_create_request": true,
    "summary": "brief summary of the task",
    "description": "detailed description",
    "priority": "Highest/High/Medium/Low/Lowest",
    "story_points": number or null,
    "due_date": "YYYY-MM-DD" or null
}

Otherwise reply with:
{
    "is_create_request": false
}

Return ONLY the JSON, nothing else."#;

const ASSIGNMENT_CHECK_PROMPT: &str = r#"You are a JIRA query analyzer. Decide whether the user's message asks to assign issues to themselves.

Typical phrasings:
- "assign all issues to me"
- "take ownership of issues"
- "claim all issues"
- "assign tickets to me"
- "take all tickets"

Return ONLY "yes" or "no", nothing else."#;

// ============================================================================
// Types
// ============================================================================

/// Parameters extracted from a creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDraft {
    pub summary: String,
    pub description: String,
    pub priority: String,
    pub story_points: Option<f64>,
    pub due_date: Option<String>,
}

/// Outcome of classifying one question
#[derive(Debug, Clone, PartialEq)]
pub enum IntentDecision {
    CreateIssue(IssueDraft),
    BulkAssign,
    ReadQuery,
}

impl IntentDecision {
    pub fn label(&self) -> &'static str {
        match self {
            IntentDecision::CreateIssue(_) => "create_issue",
            IntentDecision::BulkAssign => "bulk_assign",
            IntentDecision::ReadQuery => "read_query",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreationCheck {
    #[serde(default, alias = "isCreateRequest")]
    is_create_request: bool,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, alias = "storyPoints")]
    story_points: Option<Value>,
    #[serde(default, alias = "dueDate")]
    due_date: Option<String>,
}

// ============================================================================
// Classifier
// ============================================================================

pub struct IntentClassifier {
    completion: Arc<dyn CompletionService>,
}

impl IntentClassifier {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Classify a question.
    ///
    /// Only a failed completion call is an error. Unusable model output
    /// falls through to the next check.
    pub async fn classify(&self, question: &str) -> CompletionResult<IntentDecision> {
        let creation_reply = self
            .completion
            .complete(Some(CREATION_CHECK_PROMPT), question)
            .await?;

        match parse_creation_response(&creation_reply) {
            Ok(Some(draft)) => {
                info!(summary = %draft.summary, priority = %draft.priority, "detected issue creation request");
                return Ok(IntentDecision::CreateIssue(draft));
            }
            Ok(None) => debug!("not a creation request"),
            Err(e) => warn!(error = %e, "could not parse creation check, treating as not a creation request"),
        }

        let assignment_reply = self
            .completion
            .complete(Some(ASSIGNMENT_CHECK_PROMPT), question)
            .await?;

        if is_affirmative(&assignment_reply) {
            info!("detected bulk assignment request");
            return Ok(IntentDecision::BulkAssign);
        }

        debug!("classified as read query");
        Ok(IntentDecision::ReadQuery)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse the creation-check reply.
///
/// `Ok(None)` means the model said no, or said yes without a usable
/// summary. `Err` means the reply was not the expected JSON.
fn parse_creation_response(response_text: &str) -> Result<Option<IssueDraft>, String> {
    if response_text.trim().is_empty() {
        return Err("empty creation check response".to_string());
    }

    let json_str = extract_json_from_response(response_text);
    let check: CreationCheck = serde_json::from_str(&json_str).map_err(|e| {
        format!(
            "{} (response starts with: {:?})",
            e,
            response_text.chars().take(80).collect::<String>()
        )
    })?;

    if !check.is_create_request {
        return Ok(None);
    }

    let summary = check.summary.unwrap_or_default().trim().to_string();
    if summary.is_empty() {
        warn!("creation request without a summary, ignoring");
        return Ok(None);
    }

    let description = check
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| summary.clone());

    let priority = check
        .priority
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());

    Ok(Some(IssueDraft {
        summary,
        description,
        priority,
        story_points: check.story_points.as_ref().and_then(numeric_value),
        due_date: check
            .due_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    }))
}

/// The assignment check is affirmative only for a bare "yes".
fn is_affirmative(response_text: &str) -> bool {
    response_text.trim().to_lowercase() == "yes"
}
