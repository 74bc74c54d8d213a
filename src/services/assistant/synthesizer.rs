//! Response Synthesizer
//!
//! Turns a retrieval outcome into the text shown to the user. Found issues
//! are capped, projected to summaries and handed to the model with a
//! concise-answer instruction; an exhausted ladder gets an explanatory
//! prompt instead. A failed retrieval never reaches the model.

use std::sync::Arc;

use jira_assistant_core::{CompletionResult, CompletionService, IssueRecord};
use tracing::{debug, info};

use super::retrieval::{RelaxationRung, RetrievalOutcome};
use crate::models::issue_summary::IssueSummary;
use crate::models::schema::SchemaSnapshot;

/// Default cap on issues serialized into the model context
pub const DEFAULT_CONTEXT_LIMIT: usize = 20;

const ANSWER_SYSTEM_PROMPT: &str = r#"You are a helpful JIRA assistant. Your task is to analyze JIRA issues and provide concise, focused responses.

Important guidelines:
1. Be direct and concise - no unnecessary pleasantries or filler text
2. Focus on the most relevant information first
3. Include only essential details: issue key, summary, priority, status, and story points
4. If you had to broaden the search criteria, mention this briefly
5. For task suggestions, focus on the task's key attributes that make it suitable
6. Keep responses under 2-3 sentences unless more detail is specifically requested

Example format:
"SCRUM-123: Implement login page (High priority, 5 points, To Do)""#;

const NO_RESULTS_SYSTEM_PROMPT: &str = r#"You are a helpful JIRA assistant. The user's query returned no matching issues.
Your task is to explain why no issues were found and suggest what they might want to try instead.
Be helpful and constructive in your response."#;

pub struct ResponseSynthesizer {
    completion: Arc<dyn CompletionService>,
    context_limit: usize,
}

impl ResponseSynthesizer {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit.max(1);
        self
    }

    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    /// Produce the answer for one question.
    ///
    /// Only a failed completion call is an error; a failed retrieval is
    /// answered with a fixed message.
    pub async fn synthesize(
        &self,
        question: &str,
        outcome: &RetrievalOutcome,
        schema: &SchemaSnapshot,
    ) -> CompletionResult<String> {
        match outcome {
            RetrievalOutcome::Found {
                issues,
                filter,
                rung,
                ..
            } => {
                let context = build_issue_context(issues, schema, self.context_limit);
                let user = build_answer_prompt(question, &context, filter.as_str(), *rung);
                info!(
                    issues = issues.len().min(self.context_limit),
                    strategy = %rung,
                    "synthesizing answer"
                );
                debug!(prompt = %user, "answer prompt");
                self.completion
                    .complete(Some(ANSWER_SYSTEM_PROMPT), &user)
                    .await
            }
            RetrievalOutcome::Exhausted { original } => {
                info!("no matches, asking for an explanation");
                let user = build_no_results_prompt(question, original.as_str());
                self.completion
                    .complete(Some(NO_RESULTS_SYSTEM_PROMPT), &user)
                    .await
            }
            RetrievalOutcome::Failed { error, .. } => Ok(connection_failure_message(error)),
        }
    }
}

/// Fixed reply for a store failure during retrieval
pub fn connection_failure_message(error: &impl std::fmt::Display) -> String {
    format!(
        "Could not connect to JIRA: {}. Please check your connection and credentials and try again.",
        error
    )
}

/// Serialize at most `limit` issues as pretty JSON summaries.
pub fn build_issue_context(issues: &[IssueRecord], schema: &SchemaSnapshot, limit: usize) -> String {
    let story_points = schema.story_points_field_id();
    let summaries: Vec<IssueSummary> = issues
        .iter()
        .take(limit)
        .map(|issue| IssueSummary::from_record(issue, story_points))
        .collect();
    serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string())
}

fn build_answer_prompt(question: &str, context: &str, filter: &str, rung: RelaxationRung) -> String {
    let mut prompt = format!(
        "Based on these JIRA issues, please answer this question concisely:\n{}\n\nHere are the relevant issues:\n{}\n\nJQL query used: {}\nSearch strategy used: {}\n",
        question,
        context,
        filter,
        rung.description()
    );
    if rung.is_broadened() {
        prompt.push_str(
            "No issues matched the original criteria, so the search was broadened. Mention this briefly.\n",
        );
    }
    prompt.push_str("\nProvide a focused response that highlights the most relevant information.");
    prompt
}

fn build_no_results_prompt(question: &str, filter: &str) -> String {
    format!(
        "The user asked: {}\n\nThe JQL query used was: {}\n\nNo matching issues were found. Please explain why this might be and suggest what they could try instead.",
        question, filter
    )
}
