//! Issue Insights
//!
//! One-shot analyses that sit beside the question pipeline: a summary of a
//! set of issues, a detailed look at one issue, and improvement suggestions.

use std::sync::Arc;

use jira_assistant_core::{CompletionResult, CompletionService, IssueRecord};
use serde::Serialize;
use tracing::info;

use crate::models::issue_summary::UNASSIGNED;

/// Maximum issues included in a summary
pub const SUMMARY_ISSUE_LIMIT: usize = 20;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert JIRA analyst. Analyze the provided JIRA issues and create a concise summary. \
Focus on identifying patterns, highlighting important issues, noting priorities, and providing actionable insights. \
Be professional and factual in your analysis.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert JIRA analyst and project manager. Analyze the provided JIRA issue in detail. \
Identify key information, dependencies, risks, and suggest next steps or improvements. \
Be professional, thorough, and actionable in your analysis.";

const SUGGESTION_SYSTEM_PROMPT: &str = "You are an expert JIRA consultant. Your task is to review JIRA issues and suggest improvements \
to make them more complete, clear, and actionable. Focus on practical, specific suggestions \
that will help the team better understand and address the issue.";

#[derive(Debug, Serialize)]
struct OverviewEntry {
    key: String,
    summary: String,
    status: String,
    priority: String,
    assignee: String,
}

#[derive(Debug, Serialize)]
struct CommentEntry {
    author: String,
    created: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct IssueDetail {
    key: String,
    summary: String,
    description: String,
    status: String,
    priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    comments: Vec<CommentEntry>,
}

pub struct IssueInsights {
    completion: Arc<dyn CompletionService>,
}

impl IssueInsights {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Summarize up to `SUMMARY_ISSUE_LIMIT` issues.
    pub async fn summarize_issues(&self, issues: &[IssueRecord]) -> CompletionResult<String> {
        if issues.is_empty() {
            return Ok("No issues to summarize.".to_string());
        }

        let entries: Vec<OverviewEntry> = issues
            .iter()
            .take(SUMMARY_ISSUE_LIMIT)
            .map(overview_entry)
            .collect();
        info!(issues = entries.len(), "summarizing issues");

        let user = format!(
            "Please analyze the following JIRA issues and provide a summary:\n\n{}\n\n\
In your analysis, please include:\n\
1. A high-level overview of the issues\n\
2. Key patterns or trends\n\
3. Notable priorities or blockers\n\
4. Distribution of issue status\n\
5. Any recommendations based on this data",
            to_json(&entries)
        );
        self.completion
            .complete(Some(SUMMARY_SYSTEM_PROMPT), &user)
            .await
    }

    /// In-depth analysis of one issue, including its comments.
    pub async fn analyze_issue(&self, issue: &IssueRecord) -> CompletionResult<String> {
        info!(key = %issue.key, "analyzing issue");
        let user = format!(
            "Please analyze the following JIRA issue in detail:\n\n{}\n\n\
In your analysis, please include:\n\
1. Summary of the issue and its importance\n\
2. Assessment of completeness (is enough information provided?)\n\
3. Potential risks or blockers\n\
4. Suggested next steps\n\
5. If there are comments, summarize the key points of discussion",
            to_json(&issue_detail(issue, true))
        );
        self.completion
            .complete(Some(ANALYSIS_SYSTEM_PROMPT), &user)
            .await
    }

    /// Bullet-point suggestions for making an issue more actionable.
    pub async fn suggest_updates(&self, issue: &IssueRecord) -> CompletionResult<String> {
        info!(key = %issue.key, "suggesting updates");
        let user = format!(
            "Please review the following JIRA issue and suggest improvements:\n\n{}\n\n\
Consider:\n\
1. Is the summary clear and descriptive?\n\
2. Is the description complete and detailed?\n\
3. Is the priority appropriate?\n\
4. What additional information might be helpful?\n\
5. Any other improvements to make the issue more actionable?\n\n\
Please provide specific suggestions formatted as bullet points.",
            to_json(&issue_detail(issue, false))
        );
        self.completion
            .complete(Some(SUGGESTION_SYSTEM_PROMPT), &user)
            .await
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn name_of(named: &Option<jira_assistant_core::NamedRef>) -> String {
    named.as_ref().map(|n| n.name.clone()).unwrap_or_default()
}

fn assignee_of(issue: &IssueRecord) -> String {
    issue
        .fields
        .assignee
        .as_ref()
        .map(|a| a.display_name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNASSIGNED.to_string())
}

fn overview_entry(issue: &IssueRecord) -> OverviewEntry {
    OverviewEntry {
        key: issue.key.clone(),
        summary: issue.fields.summary.clone().unwrap_or_default(),
        status: name_of(&issue.fields.status),
        priority: name_of(&issue.fields.priority),
        assignee: assignee_of(issue),
    }
}

fn issue_detail(issue: &IssueRecord, full: bool) -> IssueDetail {
    let fields = &issue.fields;
    let comments = if full {
        fields
            .comment
            .as_ref()
            .map(|page| {
                page.comments
                    .iter()
                    .map(|c| CommentEntry {
                        author: c
                            .author
                            .as_ref()
                            .map(|a| a.display_name.clone())
                            .unwrap_or_default(),
                        created: c.created.clone(),
                        body: match &c.body {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        },
                    })
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    IssueDetail {
        key: issue.key.clone(),
        summary: fields.summary.clone().unwrap_or_default(),
        description: fields.description_text(),
        status: name_of(&fields.status),
        priority: name_of(&fields.priority),
        assignee: full.then(|| assignee_of(issue)),
        created: if full { fields.created.clone() } else { None },
        updated: if full { fields.updated.clone() } else { None },
        comments,
    }
}
