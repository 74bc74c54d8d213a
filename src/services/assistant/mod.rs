//! Question Answering Pipeline
//!
//! classify -> translate -> retrieve -> synthesize, plus the write actions
//! a question can trigger. `Assistant` ties the stages together for one
//! session.

mod actions;
mod classifier;
mod filter;
mod retrieval;
mod session;
mod synthesizer;
mod text;
mod translator;

pub use actions::{ActionExecutor, BulkAssignResult};
pub use classifier::{IntentClassifier, IntentDecision, IssueDraft, DEFAULT_PRIORITY};
pub use filter::{FilterExpression, CANONICAL_ORDERING};
pub use retrieval::{
    AdaptiveRetrievalEngine, RelaxationLadder, RelaxationRung, RetrievalAttempt, RetrievalLog,
    RetrievalOutcome, HIGHEST_PRIORITY_CLAUSE,
};
pub use session::{fetch_schema, Assistant, AssistantOptions};
pub use synthesizer::{
    build_issue_context, connection_failure_message, ResponseSynthesizer, DEFAULT_CONTEXT_LIMIT,
};
pub use text::{extract_json_from_response, strip_code_fences};
pub use translator::QueryTranslator;
