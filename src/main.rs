// Jira Assistant - CLI entry point

use anyhow::Context;
use clap::Parser;
use tracing::info;

use jira_assistant::cli::{Cli, Command};
use jira_assistant::commands::{ask, chat, check, insights, jql};
use jira_assistant::storage::ConfigService;
use jira_assistant::utils::logging::LogControl;
use jira_assistant::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut log = LogControl::init(cli.verbose)?;

    let service = ConfigService::load(cli.config.as_deref())
        .context("missing or invalid configuration")?;
    let config = service.get_config_clone();
    if config.assistant.verbose && !log.is_verbose() {
        log.set_verbose(true)?;
    }

    let state = AppState::from_config(config)?;
    let command = cli.command();
    info!(command = ?command, "starting");

    match command {
        Command::Chat => chat::run(&state, &mut log).await?,
        Command::Ask { question } => ask::run(&state, &question).await?,
        Command::Summary { jql, limit } => insights::summary(&state, jql.as_deref(), limit).await?,
        Command::Analyze { key } => insights::analyze(&state, &key).await?,
        Command::Suggest { key } => insights::suggest(&state, &key).await?,
        Command::Jql { question, run } => jql::run(&state, &question, run).await?,
        Command::Check => check::run(&state).await?,
    }

    Ok(())
}
