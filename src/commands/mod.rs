//! CLI Commands
//!
//! One module per subcommand. Each takes the shared `AppState` and prints
//! its own output.

pub mod ask;
pub mod chat;
pub mod check;
pub mod insights;
pub mod jql;
pub mod output;

pub use chat::ReplCommand;
pub use check::HealthReport;
