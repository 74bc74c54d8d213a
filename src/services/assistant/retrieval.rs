//! Adaptive Retrieval Engine
//!
//! Runs a filter against the issue store and, when nothing matches, retries
//! with progressively broader priority conditions:
//!
//! 1. the filter as given
//! 2. `priority = Highest` widened to `priority in (Highest, High)`
//! 3. widened again to `priority in (Highest, High, Medium)`
//! 4. the priority condition dropped
//!
//! Relaxation is a textual substitution on the literal `priority = Highest`.
//! A filter without that text has a one-rung ladder, so retrieval makes
//! exactly one store call. Other clause types are never relaxed.
//!
//! A store failure stops the ladder immediately and is reported as
//! `RetrievalOutcome::Failed`, which callers must keep distinct from
//! `Exhausted` (every rung ran and matched nothing).

use std::sync::Arc;
use std::time::Instant;

use jira_assistant_core::{IssueRecord, IssueStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::filter::FilterExpression;

/// Literal priority condition that enables relaxation
pub const HIGHEST_PRIORITY_CLAUSE: &str = "priority = Highest";

/// One step of the relaxation ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationRung {
    Original,
    HighOrAbove,
    MediumOrAbove,
    AnyPriority,
}

impl RelaxationRung {
    pub fn description(&self) -> &'static str {
        match self {
            RelaxationRung::Original => "original criteria",
            RelaxationRung::HighOrAbove => "high priority",
            RelaxationRung::MediumOrAbove => "medium priority",
            RelaxationRung::AnyPriority => "any priority",
        }
    }

    /// Whether results from this rung go beyond what was asked for
    pub fn is_broadened(&self) -> bool {
        *self != RelaxationRung::Original
    }
}

impl std::fmt::Display for RelaxationRung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Ordered filters to try, derived from one original filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxationLadder {
    rungs: Vec<(RelaxationRung, FilterExpression)>,
}

impl RelaxationLadder {
    pub fn from_filter(original: &FilterExpression) -> Self {
        let text = original.as_str();
        let mut rungs = vec![(RelaxationRung::Original, original.clone())];

        if text.contains(HIGHEST_PRIORITY_CLAUSE) {
            rungs.push((
                RelaxationRung::HighOrAbove,
                FilterExpression::new(
                    text.replace(HIGHEST_PRIORITY_CLAUSE, "priority in (Highest, High)"),
                ),
            ));
            rungs.push((
                RelaxationRung::MediumOrAbove,
                FilterExpression::new(
                    text.replace(HIGHEST_PRIORITY_CLAUSE, "priority in (Highest, High, Medium)"),
                ),
            ));
            rungs.push((
                RelaxationRung::AnyPriority,
                original.without_clause(&regex::escape(HIGHEST_PRIORITY_CLAUSE)),
            ));
        }

        Self { rungs }
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    pub fn rungs(&self) -> impl Iterator<Item = (RelaxationRung, &FilterExpression)> {
        self.rungs.iter().map(|(rung, filter)| (*rung, filter))
    }
}

/// Result of running a ladder
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// A rung matched at least one issue
    Found {
        issues: Vec<IssueRecord>,
        filter: FilterExpression,
        rung: RelaxationRung,
        original: FilterExpression,
    },
    /// Every rung ran without error and matched nothing
    Exhausted { original: FilterExpression },
    /// The store reported a failure; no further rungs were tried
    Failed {
        filter: FilterExpression,
        error: StoreError,
    },
}

impl RetrievalOutcome {
    pub fn issues(&self) -> &[IssueRecord] {
        match self {
            RetrievalOutcome::Found { issues, .. } => issues,
            _ => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RetrievalOutcome::Found { .. })
    }

    pub fn find_issue(&self, key: &str) -> Option<&IssueRecord> {
        self.issues()
            .iter()
            .find(|issue| issue.key.eq_ignore_ascii_case(key))
    }
}

/// Record of a single store call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalAttempt {
    pub rung: RelaxationRung,
    pub filter: String,
    /// Number of issues returned, when the call succeeded
    pub result_count: Option<usize>,
    pub error_message: Option<String>,
    pub duration_ms: u64,
    pub started_at: String,
}

impl RetrievalAttempt {
    pub fn completed(
        rung: RelaxationRung,
        filter: &FilterExpression,
        count: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            rung,
            filter: filter.to_string(),
            result_count: Some(count),
            error_message: None,
            duration_ms,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn failed(
        rung: RelaxationRung,
        filter: &FilterExpression,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            rung,
            filter: filter.to_string(),
            result_count: None,
            error_message: Some(error.into()),
            duration_ms,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self.result_count, Some(n) if n > 0)
    }
}

/// Every store call made for one retrieval
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalLog {
    pub attempts: Vec<RetrievalAttempt>,
    pub total_duration_ms: u64,
    pub successful_rung: Option<RelaxationRung>,
}

impl RetrievalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attempt(&mut self, attempt: RetrievalAttempt) {
        self.total_duration_ms += attempt.duration_ms;
        if attempt.is_hit() {
            self.successful_rung = Some(attempt.rung);
        }
        self.attempts.push(attempt);
    }

    /// Rungs that ran cleanly but matched nothing
    pub fn empty_attempts_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.result_count == Some(0))
            .count()
    }
}

pub struct AdaptiveRetrievalEngine {
    store: Arc<dyn IssueStore>,
}

impl AdaptiveRetrievalEngine {
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self { store }
    }

    /// Walk the ladder for `filter`, stopping at the first rung with
    /// results or at the first store failure.
    pub async fn retrieve(&self, filter: &FilterExpression) -> (RetrievalOutcome, RetrievalLog) {
        let ladder = RelaxationLadder::from_filter(filter);
        let mut log = RetrievalLog::new();

        debug!(rungs = ladder.len(), "starting retrieval");

        for (rung, candidate) in ladder.rungs() {
            info!(strategy = %rung, filter = %candidate, "trying search strategy");
            let started = Instant::now();

            match self.store.search(candidate.as_str()).await {
                Ok(issues) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    log.add_attempt(RetrievalAttempt::completed(
                        rung,
                        candidate,
                        issues.len(),
                        duration_ms,
                    ));

                    if !issues.is_empty() {
                        info!(strategy = %rung, count = issues.len(), "search strategy matched");
                        return (
                            RetrievalOutcome::Found {
                                issues,
                                filter: candidate.clone(),
                                rung,
                                original: filter.clone(),
                            },
                            log,
                        );
                    }
                    debug!(strategy = %rung, "no matches");
                }
                Err(e) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    error!(strategy = %rung, error = %e, "issue search failed");
                    log.add_attempt(RetrievalAttempt::failed(
                        rung,
                        candidate,
                        e.to_string(),
                        duration_ms,
                    ));
                    return (
                        RetrievalOutcome::Failed {
                            filter: candidate.clone(),
                            error: e,
                        },
                        log,
                    );
                }
            }
        }

        warn!(
            attempts = log.attempts.len(),
            filter = %filter,
            "all search strategies exhausted without matches"
        );
        (
            RetrievalOutcome::Exhausted {
                original: filter.clone(),
            },
            log,
        )
    }
}
