//! One-shot question

use super::output::print_reply;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn run(state: &AppState, question: &str) -> AppResult<()> {
    let mut assistant = state.assistant().await;
    let reply = assistant.process_query(question).await;
    print_reply(&reply);
    Ok(())
}
