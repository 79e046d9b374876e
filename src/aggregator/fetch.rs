use std::future::Future;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;

use crate::config::AppConfig;
use crate::models::TokenSymbol;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{query} query failed: {message}")]
    Query { query: &'static str, message: String },

    #[error("{query} query timed out after {timeout_ms}ms")]
    Timeout { query: &'static str, timeout_ms: u64 },

    #[error("malformed amount {amount:?}")]
    MalformedAmount { amount: String },

    #[error("{symbol} total overflowed")]
    Overflow { symbol: TokenSymbol },

    #[error("principal lookup failed: {0}")]
    Principal(String),
}

/// Knobs shared by every aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    /// Upper bound for any single store query.
    pub query_timeout: Duration,
    /// In-flight per-post reaction counts.
    pub post_reaction_concurrency: usize,
    /// Quiet window after an insert notification before recomputing.
    pub refresh_debounce: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(5),
            post_reaction_concurrency: 8,
            refresh_debounce: Duration::from_millis(250),
        }
    }
}

impl FetchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            query_timeout: config.query_timeout(),
            post_reaction_concurrency: config.post_reaction_concurrency.max(1),
            refresh_debounce: config.refresh_debounce(),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetched — value plus how it was obtained
// ---------------------------------------------------------------------------

/// Outcome of a best-effort fetch. Every variant carries a renderable value;
/// `Empty` and `Failed` carry the zero default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Fetched<T> {
    /// Computed from store data.
    Loaded { data: T },
    /// Nothing to query (no address, no principal).
    Empty { data: T },
    /// Zero fallback after an error.
    Failed { data: T, error: String },
}

impl<T> Fetched<T> {
    pub fn data(&self) -> &T {
        match self {
            Fetched::Loaded { data } | Fetched::Empty { data } | Fetched::Failed { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Fetched::Loaded { data } | Fetched::Empty { data } | Fetched::Failed { data, .. } => data,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Fetched::Loaded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetched::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn empty() -> Self {
        Fetched::Empty { data: T::default() }
    }

    pub fn failed(error: impl ToString) -> Self {
        Fetched::Failed {
            data: T::default(),
            error: error.to_string(),
        }
    }
}

impl<T: Default> Default for Fetched<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Run one store query under `timeout`, tagging failures with its name.
pub async fn timed_query<T, F>(query: &'static str, timeout: Duration, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(FetchError::Query {
            query,
            message: format!("{e:#}"),
        }),
        Err(_) => Err(FetchError::Timeout {
            query,
            timeout_ms: millis(timeout),
        }),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// The single failure policy for every aggregator: any error becomes the
/// zero default, tagged as `Failed`, and is logged rather than surfaced.
pub async fn best_effort<T, F>(operation: &'static str, fut: F) -> Fetched<T>
where
    T: Default,
    F: Future<Output = Result<T, FetchError>>,
{
    let start = Instant::now();
    counter!("aggregation_runs_total", "operation" => operation).increment(1);

    let outcome = fut.await;
    histogram!("aggregation_latency_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());

    match outcome {
        Ok(data) => Fetched::Loaded { data },
        Err(e) => {
            counter!("aggregation_failures_total", "operation" => operation).increment(1);
            tracing::warn!(operation, error = %e, "Aggregation failed, falling back to zero");
            Fetched::failed(e)
        }
    }
}
