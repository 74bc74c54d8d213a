//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::services::insights::SUMMARY_ISSUE_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "jira-assistant")]
#[command(version)]
#[command(about = "Ask questions about your Jira project in plain language")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log pipeline progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// JSON configuration file; environment variables override its values
    #[arg(long, short, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive session (default)
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question, e.g. "What are my top priorities?"
        question: String,
    },

    /// Summarize issues matching a filter
    Summary {
        /// JQL filter; defaults to the whole project
        #[arg(long)]
        jql: Option<String>,

        /// Maximum number of issues to analyze
        #[arg(long, default_value_t = SUMMARY_ISSUE_LIMIT)]
        limit: usize,
    },

    /// In-depth analysis of one issue
    Analyze {
        /// Issue key, e.g. SCRUM-123
        key: String,
    },

    /// Suggest improvements for one issue
    Suggest {
        /// Issue key, e.g. SCRUM-123
        key: String,
    },

    /// Translate a question into JQL
    Jql {
        question: String,

        /// Also run the query and list the matches
        #[arg(long)]
        run: bool,
    },

    /// Verify the Jira and language model connections
    Check,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}
