//! Terminal output helpers

use colored::Colorize;
use jira_assistant_core::IssueRecord;

use crate::models::issue_summary::{IssueSummary, UNASSIGNED};

pub fn print_banner(project_key: &str, model: &str) {
    println!("{}", "JIRA AI Assistant".cyan().bold());
    println!(
        "Project {} · model {} · type {} for commands",
        project_key.bold(),
        model.bold(),
        "help".green()
    );
}

pub fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {:<12} create a new issue step by step", "create".green());
    println!("  {:<12} assign every unassigned issue to yourself", "assign".green());
    println!("  {:<12} show one issue", "issue <KEY>".green());
    println!("  {:<12} reload fields and priorities from Jira", "refresh".green());
    println!("  {:<12} toggle progress logging", "verbose".green());
    println!("  {:<12} leave the session", "exit".green());
    println!("Anything else is treated as a question, e.g. \"What are my top priorities?\"");
}

pub fn print_reply(text: &str) {
    println!("\n{}", "Assistant".blue().bold());
    println!("{}", text.trim());
}

pub fn print_info(text: &str) {
    println!("{}", text.dimmed());
}

pub fn print_error(text: &str) {
    eprintln!("{}: {}", "error".red().bold(), text);
}

pub fn print_status(label: &str, ok: bool, detail: &str) {
    let badge = if ok { "OK".green().bold() } else { "FAILED".red().bold() };
    println!("{:<8} {:<14} {}", badge, label, detail);
}

/// One line per issue: key, summary, priority and status.
pub fn issue_line(issue: &IssueSummary) -> String {
    format!(
        "{}: {} ({}, {})",
        issue.key, issue.summary, issue.priority, issue.status
    )
}

pub fn print_issue_list(issues: &[IssueRecord], story_points_field: Option<&str>) {
    for issue in issues {
        let summary = IssueSummary::from_record(issue, story_points_field);
        println!("  {}", issue_line(&summary));
    }
}

pub fn print_issue(issue: &IssueRecord, story_points_field: Option<&str>) {
    let summary = IssueSummary::from_record(issue, story_points_field);
    println!("{} {}", summary.key.cyan().bold(), summary.summary.bold());
    println!("  Status:    {}", summary.status);
    println!("  Priority:  {}", summary.priority);
    println!("  Type:      {}", summary.issue_type);
    if summary.assignee == UNASSIGNED {
        println!("  Assignee:  {}", summary.assignee.dimmed());
    } else {
        println!("  Assignee:  {}", summary.assignee);
    }
    if let Some(points) = summary.story_points {
        println!("  Points:    {}", points);
    }
    if let Some(due) = &summary.due_date {
        println!("  Due:       {}", due);
    }
    println!("  Created:   {}", summary.created);
    println!("  Updated:   {}", summary.updated);

    let description = issue.fields.description_text();
    if !description.trim().is_empty() {
        println!("\n{}", description.trim());
    }
}
