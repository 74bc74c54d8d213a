//! Assistant Session
//!
//! Owns the pipeline components and the per-session state: the schema
//! snapshot and the most recent retrieval outcome. Every public operation
//! returns something displayable; failures inside a turn are converted to
//! messages here so the caller's loop keeps running.

use std::sync::Arc;

use jira_assistant_core::{
    CompletionError, CompletionResult, CompletionService, IssueRecord, IssueStore, StoreResult,
};
use tracing::{debug, info, warn};

use super::actions::{ActionExecutor, BulkAssignResult};
use super::classifier::{IntentClassifier, IntentDecision, IssueDraft};
use super::filter::FilterExpression;
use super::retrieval::{AdaptiveRetrievalEngine, RetrievalLog, RetrievalOutcome};
use super::synthesizer::{ResponseSynthesizer, DEFAULT_CONTEXT_LIMIT};
use super::translator::QueryTranslator;
use crate::models::schema::SchemaSnapshot;
use crate::models::settings::AppConfig;

/// Session parameters taken from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantOptions {
    pub project_key: String,
    pub default_issue_type: String,
    pub context_issue_limit: usize,
    pub bulk_assign_filter: String,
}

impl AssistantOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            project_key: config.jira.project_key.clone(),
            default_issue_type: config.assistant.default_issue_type.clone(),
            context_issue_limit: config.assistant.context_issue_limit,
            bulk_assign_filter: config.assistant.bulk_assign_filter.clone(),
        }
    }
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            project_key: "SCRUM".to_string(),
            default_issue_type: "Task".to_string(),
            context_issue_limit: DEFAULT_CONTEXT_LIMIT,
            bulk_assign_filter: "assignee is EMPTY".to_string(),
        }
    }
}

pub struct Assistant {
    store: Arc<dyn IssueStore>,
    options: AssistantOptions,
    classifier: IntentClassifier,
    translator: QueryTranslator,
    retrieval: AdaptiveRetrievalEngine,
    synthesizer: ResponseSynthesizer,
    actions: ActionExecutor,
    schema: SchemaSnapshot,
    last_outcome: Option<RetrievalOutcome>,
}

impl Assistant {
    /// Build a session with an empty schema snapshot.
    pub fn new(
        store: Arc<dyn IssueStore>,
        completion: Arc<dyn CompletionService>,
        options: AssistantOptions,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(completion.clone()),
            translator: QueryTranslator::new(completion.clone(), options.project_key.clone()),
            retrieval: AdaptiveRetrievalEngine::new(store.clone()),
            synthesizer: ResponseSynthesizer::new(completion)
                .with_context_limit(options.context_issue_limit),
            actions: ActionExecutor::new(store.clone(), options.project_key.clone()),
            store,
            options,
            schema: SchemaSnapshot::empty(),
            last_outcome: None,
        }
    }

    /// Build a session and fetch the schema snapshot. A failed fetch leaves
    /// the snapshot empty.
    pub async fn start(
        store: Arc<dyn IssueStore>,
        completion: Arc<dyn CompletionService>,
        options: AssistantOptions,
    ) -> Self {
        let mut assistant = Self::new(store, completion, options);
        if let Err(e) = assistant.refresh_schema().await {
            warn!(error = %e, "could not fetch tracker schema, continuing without it");
        }
        assistant
    }

    pub fn with_schema(mut self, schema: SchemaSnapshot) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    pub fn options(&self) -> &AssistantOptions {
        &self.options
    }

    pub fn last_outcome(&self) -> Option<&RetrievalOutcome> {
        self.last_outcome.as_ref()
    }

    /// Replace the schema snapshot with a fresh one from the store.
    pub async fn refresh_schema(&mut self) -> StoreResult<()> {
        self.schema = fetch_schema(self.store.as_ref()).await?;
        info!(
            fields = self.schema.field_names().count(),
            priorities = self.schema.priority_names().len(),
            "loaded tracker schema"
        );
        Ok(())
    }

    /// Answer one question or carry out the action it asks for.
    pub async fn process_query(&mut self, question: &str) -> String {
        let question = question.trim();
        if question.is_empty() {
            return "Please ask a question about your JIRA issues.".to_string();
        }

        let decision = match self.classifier.classify(question).await {
            Ok(decision) => decision,
            Err(e) => return completion_failure_message(&e),
        };
        debug!(intent = decision.label(), "classified question");

        match decision {
            IntentDecision::CreateIssue(draft) => self.create_issue(&draft, None).await,
            IntentDecision::BulkAssign => self.bulk_assign().await.to_message(),
            IntentDecision::ReadQuery => self.answer(question).await,
        }
    }

    async fn answer(&mut self, question: &str) -> String {
        let filter = match self.generate_filter(question).await {
            Ok(filter) => filter,
            Err(e) => return completion_failure_message(&e),
        };

        let (outcome, _) = self.retrieve(&filter).await;
        let reply = self
            .synthesizer
            .synthesize(question, &outcome, &self.schema)
            .await;
        self.last_outcome = Some(outcome);

        reply.unwrap_or_else(|e| completion_failure_message(&e))
    }

    /// Translate a question into a guarded filter without running it.
    pub async fn generate_filter(&self, question: &str) -> CompletionResult<FilterExpression> {
        let filter = self.translator.translate(question, &self.schema).await?;
        Ok(filter.with_guards(&self.options.project_key))
    }

    /// Run a filter through the relaxation ladder. Guards are applied first.
    pub async fn retrieve(&self, filter: &FilterExpression) -> (RetrievalOutcome, RetrievalLog) {
        let guarded = filter.with_guards(&self.options.project_key);
        let (outcome, log) = self.retrieval.retrieve(&guarded).await;
        info!(
            attempts = log.attempts.len(),
            strategy = ?log.successful_rung.map(|r| r.description()),
            empty = log.empty_attempts_count(),
            duration_ms = log.total_duration_ms,
            "retrieval finished"
        );
        (outcome, log)
    }

    /// Create an issue from a draft. `issue_type` defaults to the
    /// configured type.
    pub async fn create_issue(&self, draft: &IssueDraft, issue_type: Option<&str>) -> String {
        let issue_type = issue_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.options.default_issue_type);
        self.actions
            .create_issue(draft, issue_type, &self.schema)
            .await
    }

    /// Assign every issue matching the configured filter to the caller.
    pub async fn bulk_assign(&self) -> BulkAssignResult {
        let filter = FilterExpression::new(self.options.bulk_assign_filter.as_str());
        self.actions.bulk_assign(&filter).await
    }

    /// Look up an issue, preferring the most recent search results.
    pub async fn issue_details(&self, key: &str) -> StoreResult<IssueRecord> {
        let key = key.trim();
        if let Some(issue) = self.last_outcome.as_ref().and_then(|o| o.find_issue(key)) {
            debug!(key, "serving issue from last search");
            return Ok(issue.clone());
        }
        self.store.get_issue(key).await
    }
}

/// Fetch fields and priority levels from the store.
pub async fn fetch_schema(store: &dyn IssueStore) -> StoreResult<SchemaSnapshot> {
    let fields = store.get_schema_fields().await?;
    let priorities = store.get_priority_levels().await?;
    Ok(SchemaSnapshot::new(fields, priorities))
}

fn completion_failure_message(error: &CompletionError) -> String {
    warn!(error = %error, "language model call failed");
    format!("Sorry, I couldn't process that request: {}", error)
}
