//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod issue_summary;
pub mod schema;
pub mod settings;

pub use issue_summary::*;
pub use schema::*;
pub use settings::*;
