use std::sync::Arc;

use crate::error::{MatcherError, Result};
use crate::matching::normalize::normalize;
use crate::matching::{MatchOutcome, classify};
use crate::ports::catalog::{Candidate, CatalogSearch, CredentialProvider};
use crate::services::pacing::Pacer;

/// What the runner does when a query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first error
    #[default]
    Abort,
    /// Log the error, remember the query and move on
    Continue,
}

/// Accumulated output of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// One catalog URI per line, exact and partial matches alike
    pub matches: String,
    /// One `` `query` *vs* `candidate` `` line per partial match
    pub partials: String,
    /// One unmatched query per line
    pub unmatched: String,
    /// Queries that errored under [`ErrorPolicy::Continue`]
    pub failed: Vec<String>,
    /// Every outcome, in playlist order
    pub outcomes: Vec<MatchOutcome>,
}

impl RunResult {
    pub fn record(&mut self, outcome: MatchOutcome) {
        match &outcome {
            MatchOutcome::Exact { .. } => {}
            MatchOutcome::Partial {
                query,
                candidate_text,
                ..
            } => push_line(&mut self.partials, &partial_line(query, candidate_text)),
            MatchOutcome::Unmatched { query } => push_line(&mut self.unmatched, query),
        }
        // A partial match is still usable, so it lands in the playlist too
        if let Some(uri) = outcome.uri() {
            push_line(&mut self.matches, uri);
        }
        self.outcomes.push(outcome);
    }

    /// Counts of (exact, partial, unmatched)
    pub fn tally(&self) -> (usize, usize, usize) {
        self.outcomes
            .iter()
            .fold((0, 0, 0), |(e, p, u), outcome| match outcome {
                MatchOutcome::Exact { .. } => (e + 1, p, u),
                MatchOutcome::Partial { .. } => (e, p + 1, u),
                MatchOutcome::Unmatched { .. } => (e, p, u + 1),
            })
    }
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

/// Diagnostic line for a partial match
pub fn partial_line(query: &str, candidate_text: &str) -> String {
    format!("`{}` *vs* `{}`", query, candidate_text)
}

/// A run stopped by an error, with everything matched before it.
#[derive(Debug, thiserror::Error)]
#[error("Matching aborted at `{query}`: {error}")]
pub struct BatchAbort {
    pub query: String,
    #[source]
    pub error: MatcherError,
    pub partial: RunResult,
}

/// Matches a playlist one line at a time against the catalog.
pub struct BatchRunner {
    catalog: Arc<dyn CatalogSearch>,
    credentials: Arc<dyn CredentialProvider>,
    pacer: Box<dyn Pacer>,
    policy: ErrorPolicy,
}

impl BatchRunner {
    pub fn new(
        catalog: Arc<dyn CatalogSearch>,
        credentials: Arc<dyn CredentialProvider>,
        pacer: Box<dyn Pacer>,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            catalog,
            credentials,
            pacer,
            policy,
        }
    }

    /// Match every non-blank line in order.
    pub async fn run<S: AsRef<str>>(&self, lines: &[S]) -> Result<RunResult, BatchAbort> {
        let mut result = RunResult::default();

        for line in lines {
            let query = normalize(line.as_ref());
            if query.is_empty() {
                continue;
            }

            match self.match_query(&query).await {
                Ok(outcome) => {
                    log_outcome(&query, &outcome);
                    result.record(outcome);
                }
                Err(error) => match self.policy {
                    ErrorPolicy::Abort => {
                        return Err(BatchAbort {
                            query,
                            error,
                            partial: result,
                        });
                    }
                    ErrorPolicy::Continue => {
                        log::error!("FAILED: {}: {}", query, error);
                        result.failed.push(query);
                    }
                },
            }
        }

        Ok(result)
    }

    async fn match_query(&self, query: &str) -> Result<MatchOutcome> {
        let candidates = self.search_reauthenticating(query).await?;
        Ok(classify(query, &candidates))
    }

    /// Search once; if the token is rejected, refresh it and try exactly once more.
    async fn search_reauthenticating(&self, query: &str) -> Result<Vec<Candidate>> {
        let credential = self.credentials.valid_credential().await?;
        self.pacer.wait().await;

        match self.catalog.search(query, &credential).await {
            Err(error) if error.is_auth() => {
                log::warn!("Access token rejected ({}), refreshing and retrying", error);
                self.credentials.invalidate().await;
                let credential = self.credentials.valid_credential().await?;
                self.pacer.wait().await;
                self.catalog.search(query, &credential).await
            }
            other => other,
        }
    }
}

/// One log line per matched query; exact matches name the query they came from.
fn outcome_message(query: &str, outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Exact { uri } => format!("MATCHED: {} ({})", query, uri),
        MatchOutcome::Partial {
            query,
            candidate_text,
            distance,
            ..
        } => format!(
            "PARTIAL: {} (distance {})",
            partial_line(query, candidate_text),
            distance
        ),
        MatchOutcome::Unmatched { query } => format!("UNMATCHED: {}", query),
    }
}

fn log_outcome(query: &str, outcome: &MatchOutcome) {
    let message = outcome_message(query, outcome);
    match outcome {
        MatchOutcome::Exact { .. } => log::info!("{}", message),
        _ => log::warn!("{}", message),
    }
}
