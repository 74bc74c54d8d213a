//! Query Translator
//!
//! Turns a read question into a JQL filter with the help of the language
//! model. The prompt carries the schema snapshot so the model only sees
//! field and priority names that exist in the tracker.

use std::sync::Arc;

use jira_assistant_core::{CompletionResult, CompletionService};
use regex::Regex;
use tracing::{debug, info};

use super::filter::{FilterExpression, CANONICAL_ORDERING};
use super::text::strip_code_fences;
use crate::models::schema::{SchemaSnapshot, DUE_DATE_FIELD, STORY_POINTS_FIELD};

/// Clause restricting results to the caller's own issues
const SELF_ASSIGNMENT_CLAUSE: &str = r"assignee\s*(=|in)\s*\(?\s*currentUser\(\)\s*\)?";

/// Phrasings that explicitly ask about the caller's own assignments
const PERSONAL_ASSIGNMENT_PATTERNS: &[&str] = &[
    r"(?i)\bassigned\s+to\s+(me|myself)\b",
    r"(?i)\bmy\s+assigned\b",
    r"(?i)\bi('m|\s+am)\s+assigned\b",
    r"(?i)\bmy\s+(issues|tickets|tasks|bugs|stories|work)\b",
    r"(?i)\bon\s+my\s+plate\b",
    r"(?i)\bmine\b",
];

pub struct QueryTranslator {
    completion: Arc<dyn CompletionService>,
    project_key: String,
    personal_patterns: Vec<Regex>,
}

impl QueryTranslator {
    pub fn new(completion: Arc<dyn CompletionService>, project_key: impl Into<String>) -> Self {
        Self {
            completion,
            project_key: project_key.into(),
            personal_patterns: compile_patterns(PERSONAL_ASSIGNMENT_PATTERNS),
        }
    }

    /// Translate a question into a filter.
    ///
    /// The reply is trimmed and unfenced but not validated. A
    /// self-assignment clause is dropped unless the question asks about the
    /// caller's own issues.
    pub async fn translate(
        &self,
        question: &str,
        schema: &SchemaSnapshot,
    ) -> CompletionResult<FilterExpression> {
        let system = build_system_prompt(&self.project_key, schema);
        let user = build_user_message(question, &self.project_key);

        debug!(fields = schema.field_names().count(), "requesting filter translation");
        let reply = self.completion.complete(Some(&system), &user).await?;

        let mut filter = FilterExpression::new(strip_code_fences(&reply));
        if !self.asks_about_own_assignments(question) {
            let stripped = filter.without_clause(SELF_ASSIGNMENT_CLAUSE);
            if stripped != filter {
                info!("removed self-assignment clause not asked for in the question");
                filter = stripped;
            }
        }

        info!(filter = %filter, "generated filter");
        Ok(filter)
    }

    pub fn asks_about_own_assignments(&self, question: &str) -> bool {
        self.personal_patterns.iter().any(|re| re.is_match(question))
    }
}

fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

// ============================================================================
// Prompts
// ============================================================================

fn build_system_prompt(project_key: &str, schema: &SchemaSnapshot) -> String {
    let field_names: Vec<&str> = schema.field_names().collect();
    let priorities = schema.priority_names().join(", ");

    let mut prompt = String::from(
        "You are a JIRA query expert. Convert natural language questions into a single-line JQL query.\n\n",
    );

    if field_names.is_empty() {
        prompt.push_str("Available fields: use only standard fields (project, status, issuetype, priority, assignee, updated).\n");
    } else {
        prompt.push_str(&format!("Available fields: {}\n", field_names.join(", ")));
    }
    if !priorities.is_empty() {
        prompt.push_str(&format!("Available priorities: {}\n", priorities));
    }

    prompt.push_str("\nRules:\n");
    let mut rules: Vec<String> = vec![
        format!("Always start the query with project = \"{}\".", project_key),
        "Only reference fields from the available fields list.".to_string(),
        "Put double quotes around status values, e.g. status in (\"To Do\", \"In Progress\").".to_string(),
        "Put double quotes around issue type values, e.g. issuetype in (\"Task\", \"Story\", \"Bug\").".to_string(),
        "Use assignee = currentUser() ONLY when the question explicitly asks about issues assigned to the user.".to_string(),
    ];
    if !priorities.is_empty() {
        rules.push("For priority conditions use the exact priority names listed above.".to_string());
    }
    if schema.has_field(DUE_DATE_FIELD) {
        rules.push("For overdue or due items use duedate <= now().".to_string());
    }
    if schema.has_field(STORY_POINTS_FIELD) {
        rules.push(format!(
            "Choose a story point range from the duration language in the question: \"quick\" or \"small\" tasks use \"{f}\" <= 3; \"full day\" or \"long\" tasks use \"{f}\" >= 8; otherwise (including \"medium\") use \"{f}\" <= 5.",
            f = STORY_POINTS_FIELD
        ));
    }
    rules.push(format!("Always end the query with {}.", CANONICAL_ORDERING));

    for (i, rule) in rules.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, rule));
    }

    prompt.push_str("\nReturn ONLY the JQL query, nothing else.");
    prompt
}

fn build_user_message(question: &str, project_key: &str) -> String {
    format!(
        "Convert this question into a JQL query:\n{}\n\nAlways start with project = \"{}\" and only use fields from the available fields list.",
        question, project_key
    )
}
