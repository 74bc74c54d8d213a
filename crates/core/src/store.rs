//! Issue Store Trait
//!
//! The capability surface the assistant needs from an issue tracker. The
//! pipeline only ever talks to this trait, which keeps the HTTP client out of
//! the core logic and lets tests substitute scripted stores.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreResult;
use crate::issue::{
    CreatedIssue, CurrentUser, FieldDefinition, IssueRecord, NewIssue, PriorityLevel,
};

/// An issue tracker the assistant can read from and act on.
///
/// Implementations report transport failures and non-success statuses as
/// `Err`. A search that matches nothing returns `Ok` with an empty vector;
/// callers rely on that distinction.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Run a filter expression and return every matching issue.
    ///
    /// Pagination is handled internally; the returned vector is complete.
    async fn search(&self, filter: &str) -> StoreResult<Vec<IssueRecord>>;

    /// Fetch a single issue by key.
    async fn get_issue(&self, key: &str) -> StoreResult<IssueRecord>;

    /// List every field defined in the tracker.
    async fn get_schema_fields(&self) -> StoreResult<Vec<FieldDefinition>>;

    /// List every priority level defined in the tracker.
    async fn get_priority_levels(&self) -> StoreResult<Vec<PriorityLevel>>;

    /// Phase one of issue creation: required fields only.
    async fn create_issue(&self, issue: &NewIssue) -> StoreResult<CreatedIssue>;

    /// Phase two of issue creation, or any later edit. Keys are field
    /// identifiers.
    async fn update_issue_fields(&self, key: &str, fields: Map<String, Value>) -> StoreResult<()>;

    async fn set_assignee(&self, key: &str, account_id: &str) -> StoreResult<()>;

    /// Resolve the account the store credentials belong to.
    async fn get_current_user(&self) -> StoreResult<CurrentUser>;

    /// Check that the store is reachable with the configured credentials.
    async fn health_check(&self) -> StoreResult<()> {
        self.get_current_user().await.map(|_| ())
    }
}
