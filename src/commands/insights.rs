//! Summary, analysis and suggestion commands

use colored::Colorize;
use tracing::info;

use super::output::{print_info, print_reply};
use crate::services::assistant::FilterExpression;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Summarize issues matching `jql` (the whole project when absent).
pub async fn summary(state: &AppState, jql: Option<&str>, limit: usize) -> AppResult<()> {
    let project_key = &state.config().jira.project_key;
    let filter = FilterExpression::new(jql.unwrap_or_default()).with_guards(project_key);
    info!(filter = %filter, limit, "fetching issues for summary");

    let mut issues = state.store().search(filter.as_str()).await?;
    let total = issues.len();
    issues.truncate(limit);
    print_info(&format!("Analyzing {} of {} issues", issues.len(), total));

    let reply = state.insights().summarize_issues(&issues).await?;
    print_reply(&reply);
    Ok(())
}

pub async fn analyze(state: &AppState, key: &str) -> AppResult<()> {
    let issue = state.store().get_issue(key).await?;
    println!("{} {}", issue.key.cyan().bold(), issue.fields.summary.clone().unwrap_or_default());
    let reply = state.insights().analyze_issue(&issue).await?;
    print_reply(&reply);
    Ok(())
}

pub async fn suggest(state: &AppState, key: &str) -> AppResult<()> {
    let issue = state.store().get_issue(key).await?;
    let reply = state.insights().suggest_updates(&issue).await?;
    print_reply(&reply);
    Ok(())
}
