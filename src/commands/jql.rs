//! Question-to-JQL command

use colored::Colorize;

use super::output::{print_info, print_issue_list};
use crate::services::assistant::RetrievalOutcome;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn run(state: &AppState, question: &str, execute: bool) -> AppResult<()> {
    let assistant = state.assistant().await;
    let filter = assistant.generate_filter(question).await?;
    println!("{}", filter.as_str().green());

    if !execute {
        return Ok(());
    }

    let (outcome, _) = assistant.retrieve(&filter).await;
    match outcome {
        RetrievalOutcome::Found {
            issues,
            filter: used,
            rung,
            ..
        } => {
            if rung.is_broadened() {
                print_info(&format!("No exact matches; broadened to {}: {}", rung, used));
            }
            print_info(&format!("{} issues", issues.len()));
            print_issue_list(&issues, assistant.schema().story_points_field_id());
        }
        RetrievalOutcome::Exhausted { .. } => print_info("No matching issues"),
        RetrievalOutcome::Failed { error, .. } => return Err(error.into()),
    }
    Ok(())
}
