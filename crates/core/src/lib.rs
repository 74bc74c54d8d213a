//! Jira Assistant Core
//!
//! Collaborator seams and shared data types for the Jira Assistant workspace.
//! This crate has no dependency on HTTP clients, model providers or the CLI.
//!
//! ## Module Organization
//!
//! - `error` - Error types (`CoreError`, `StoreError`, `CompletionError`)
//! - `issue` - Issue records and tracker metadata as they appear on the wire
//! - `store` - The `IssueStore` trait
//! - `completion` - The `CompletionService` trait
//!
//! ## Design Principles
//!
//! 1. **Only serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based seams** - the pipeline is tested against scripted doubles
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod completion;
pub mod error;
pub mod issue;
pub mod store;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{
    CompletionError, CompletionResult, CoreError, CoreResult, StoreError, StoreResult,
};

// ── Issue Data ─────────────────────────────────────────────────────────
pub use issue::{
    Comment, CommentPage, CreatedIssue, CurrentUser, FieldDefinition, IssueFields, IssueRecord,
    NamedRef, NewIssue, PriorityLevel, UserRef,
};

// ── Collaborator Traits ────────────────────────────────────────────────
pub use completion::CompletionService;
pub use store::IssueStore;
