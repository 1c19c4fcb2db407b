/// Web search collaborators and the chunked fan-out over them.
pub mod google;
pub mod simulated;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{MatchCandidate, MatchOrigin, clamp_score, merge};
use crate::similarity::similarity;
use crate::text::chunk_by_sentences;

pub use google::GoogleSearch;
pub use simulated::SimulatedSearch;

/// Errors a search provider can report for a single query.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("quota exhausted: {0}")]
    Quota(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("search credentials missing")]
    MissingCredentials,
}

/// One raw hit as returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCredentials {
    pub api_key: String,
    pub search_engine_id: String,
}

impl SearchCredentials {
    /// Both the key and the engine id are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.search_engine_id.trim().is_empty()
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .finish()
    }
}

/// A web search backend.
///
/// Zero hits is `Ok(vec![])`, never an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        credentials: &SearchCredentials,
    ) -> Result<Vec<SearchHit>, ProviderError>;

    /// Origin recorded on matches built from this provider's hits.
    fn origin(&self) -> MatchOrigin {
        MatchOrigin::Web
    }
}

/// Knobs for [`search_across_chunks`].
#[derive(Debug, Clone)]
pub struct FanOutSettings {
    pub query_chunk_chars: usize,
    pub min_query_chunk_chars: usize,
    pub max_query_chunks: usize,
    pub max_results: usize,
    pub timeout: Duration,
}

impl FanOutSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            query_chunk_chars: config.chunking.query_chunk_chars,
            min_query_chunk_chars: config.chunking.min_query_chunk_chars,
            max_query_chunks: config.search.max_query_chunks,
            max_results: config.search.max_results,
            timeout: config.search.timeout(),
        }
    }
}

impl Default for FanOutSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FanOutOutcome {
    /// At least one query got an answer (possibly an empty one).
    Completed(Vec<MatchCandidate>),
    /// Every query failed or timed out.
    ProviderUnavailable,
}

/// The queries sent for `text`: sentence chunks long enough to be useful,
/// at most `max_query_chunks` of them.
///
/// When no chunk reaches the minimum length the whole normalized text is
/// sent as a single query.
pub fn query_chunks(text: &str, settings: &FanOutSettings) -> Vec<String> {
    let chunks = chunk_by_sentences(text, settings.query_chunk_chars);
    if chunks.is_empty() {
        return Vec::new();
    }

    let queries: Vec<String> = chunks
        .iter()
        .filter(|c| c.content.chars().count() >= settings.min_query_chunk_chars)
        .take(settings.max_query_chunks)
        .map(|c| c.content.clone())
        .collect();

    if queries.is_empty() {
        return vec![crate::text::normalize(text)];
    }
    queries
}

async fn run_query(
    provider: &dyn SearchProvider,
    query: &str,
    credentials: &SearchCredentials,
    timeout: Duration,
) -> Option<Vec<SearchHit>> {
    match tokio::time::timeout(timeout, provider.search(query, credentials)).await {
        Ok(Ok(hits)) => {
            debug!("Query returned {} hits", hits.len());
            Some(hits)
        }
        Ok(Err(e)) => {
            warn!("Search query failed: {e}");
            None
        }
        Err(_) => {
            warn!("Search query failed: {}", ProviderError::Timeout(timeout));
            None
        }
    }
}

/// Queries `provider` with the leading chunks of `text` concurrently and
/// merges the hits.
///
/// Every hit is scored against the whole of `text`, not just the chunk that
/// found it. Results are deduplicated by URL (first wins), ranked and cut to
/// `max_results`. A failed or timed-out query contributes nothing; only when
/// every query fails is the provider reported unavailable.
pub async fn search_across_chunks(
    text: &str,
    provider: &dyn SearchProvider,
    credentials: &SearchCredentials,
    settings: &FanOutSettings,
) -> FanOutOutcome {
    let queries = query_chunks(text, settings);
    if queries.is_empty() {
        return FanOutOutcome::Completed(Vec::new());
    }
    info!("Searching with {} query chunks", queries.len());

    let responses = join_all(
        queries
            .iter()
            .map(|q| run_query(provider, q, credentials, settings.timeout)),
    )
    .await;

    if responses.iter().all(Option::is_none) {
        return FanOutOutcome::ProviderUnavailable;
    }

    let origin = provider.origin();
    let candidates = responses
        .into_iter()
        .flatten()
        .flatten()
        .map(|hit| MatchCandidate {
            similarity: clamp_score(similarity(text, &hit.snippet)),
            snippet: (!hit.snippet.trim().is_empty()).then_some(hit.snippet),
            source_url: hit.url,
            title: hit.title,
            origin,
        })
        .collect();

    let mut merged = merge(candidates);
    merged.truncate(settings.max_results);
    FanOutOutcome::Completed(merged)
}
