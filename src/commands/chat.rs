//! Interactive Session
//!
//! Reads one line at a time and runs it to completion before reading the
//! next. A failed turn prints a message; only exit commands, Ctrl-C or
//! Ctrl-D end the loop.

use std::sync::OnceLock;

use regex::Regex;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use super::output::{print_banner, print_error, print_help, print_info, print_issue, print_reply};
use crate::services::assistant::{Assistant, IssueDraft, DEFAULT_PRIORITY};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::LogControl;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    ToggleVerbose,
    Help,
    Create,
    Assign,
    Issue(String),
    Refresh,
    Question(String),
    Empty,
}

fn issue_key_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]+-\d+$").ok())
        .as_ref()
}

/// Whether `text` looks like an issue key such as `SCRUM-42`
pub fn is_issue_key(text: &str) -> bool {
    issue_key_regex()
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        let lower = line.to_lowercase();
        match lower.as_str() {
            "exit" | "quit" | "bye" => return ReplCommand::Exit,
            "verbose" => return ReplCommand::ToggleVerbose,
            "help" | "?" => return ReplCommand::Help,
            "create" => return ReplCommand::Create,
            "assign" => return ReplCommand::Assign,
            "refresh" => return ReplCommand::Refresh,
            _ => {}
        }

        if let Some(rest) = lower.strip_prefix("issue ") {
            let key = rest.trim().to_uppercase();
            if is_issue_key(&key) {
                return ReplCommand::Issue(key);
            }
        }

        ReplCommand::Question(line.to_string())
    }
}

pub async fn run(state: &AppState, log: &mut LogControl) -> AppResult<()> {
    let mut assistant = state.assistant().await;
    let mut editor = DefaultEditor::new().map_err(readline_error)?;

    print_banner(&state.config().jira.project_key, state.completion().model());

    loop {
        let line = match read_line(&mut editor, "\nYou> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(readline_error(e)),
        };
        let _ = editor.add_history_entry(line.as_str());

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Exit => break,
            ReplCommand::Help => print_help(),
            ReplCommand::ToggleVerbose => match log.toggle() {
                Ok(true) => print_info("Verbose logging on"),
                Ok(false) => print_info("Verbose logging off"),
                Err(e) => print_error(&e.to_string()),
            },
            ReplCommand::Refresh => match assistant.refresh_schema().await {
                Ok(()) => print_info(&format!(
                    "Loaded {} fields and {} priorities",
                    assistant.schema().field_names().count(),
                    assistant.schema().priority_names().len()
                )),
                Err(e) => print_error(&format!("Could not refresh schema: {}", e)),
            },
            ReplCommand::Issue(key) => show_issue(&assistant, &key).await,
            ReplCommand::Assign => {
                let result = assistant.bulk_assign().await;
                print_reply(&result.to_message());
            }
            ReplCommand::Create => match interactive_create(&mut editor, &assistant).await {
                Ok(Some(reply)) => print_reply(&reply),
                Ok(None) => print_info("Cancelled"),
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    print_info("Cancelled")
                }
                Err(e) => print_error(&e.to_string()),
            },
            ReplCommand::Question(question) => {
                debug!(question = %question, "processing question");
                let reply = assistant.process_query(&question).await;
                print_reply(&reply);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn show_issue(assistant: &Assistant, key: &str) {
    match assistant.issue_details(key).await {
        Ok(issue) => print_issue(&issue, assistant.schema().story_points_field_id()),
        Err(e) => print_error(&format!("Could not load {}: {}", key, e)),
    }
}

/// Collect issue fields step by step. `Ok(None)` means the user gave no
/// summary.
async fn interactive_create(
    editor: &mut DefaultEditor,
    assistant: &Assistant,
) -> Result<Option<String>, ReadlineError> {
    let summary = read_line(editor, "Summary: ")?.trim().to_string();
    if summary.is_empty() {
        return Ok(None);
    }

    println!("Description (finish with an empty line):");
    let mut lines = Vec::new();
    loop {
        let line = read_line(editor, "")?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    let description = if lines.is_empty() {
        summary.clone()
    } else {
        lines.join("\n")
    };

    let default_type = assistant.options().default_issue_type.clone();
    let issue_type = read_line(editor, &format!("Issue type [{}]: ", default_type))?;
    let priority = read_line(editor, &format!("Priority [{}]: ", DEFAULT_PRIORITY))?;

    let draft = IssueDraft {
        summary,
        description,
        priority: non_empty_or(priority, DEFAULT_PRIORITY),
        story_points: None,
        due_date: None,
    };
    let issue_type = non_empty_or(issue_type, &default_type);

    Ok(Some(assistant.create_issue(&draft, Some(&issue_type)).await))
}

fn non_empty_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Result<String, ReadlineError> {
    tokio::task::block_in_place(|| editor.readline(prompt))
}

fn readline_error(e: ReadlineError) -> AppError {
    AppError::internal(format!("terminal input failed: {}", e))
}
