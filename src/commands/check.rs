//! Connection Check
//!
//! Verifies the Jira credentials and the language model key.

use serde::Serialize;

use super::output::print_status;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub issue_store: bool,
    pub completion: bool,
    pub status: String,
}

impl HealthReport {
    pub fn new(issue_store: bool, completion: bool) -> Self {
        let status = match (issue_store, completion) {
            (true, true) => "healthy",
            (false, false) => "unavailable",
            _ => "degraded",
        };
        Self {
            issue_store,
            completion,
            status: status.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.issue_store && self.completion
    }
}

pub async fn collect(state: &AppState) -> HealthReport {
    let store = state.store();
    let completion = state.completion();

    let store_ok = match store.get_current_user().await {
        Ok(user) => {
            let who = user
                .email_address
                .or(user.display_name)
                .unwrap_or(user.account_id);
            print_status("Jira", true, &format!("authenticated as {}", who));
            true
        }
        Err(e) => {
            print_status("Jira", false, &e.to_string());
            false
        }
    };

    let completion_ok = match completion.health_check().await {
        Ok(()) => {
            print_status("Language model", true, completion.model());
            true
        }
        Err(e) => {
            print_status("Language model", false, &e.to_string());
            false
        }
    };

    HealthReport::new(store_ok, completion_ok)
}

pub async fn run(state: &AppState) -> AppResult<()> {
    let report = collect(state).await;
    if report.is_healthy() {
        Ok(())
    } else {
        Err(AppError::internal(format!("connection check {}", report.status)))
    }
}
