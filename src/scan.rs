/// The scan surface: one call from submitted text to a scored result.
///
/// A scan never fails because a collaborator did. Provider outages, missing
/// credentials and unreadable documents degrade the result and are reported
/// as [`ScanWarning`]s; only empty input is an error.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::corpus::{CorpusStore, StaticCorpus};
use crate::matcher::MatchFinder;
use crate::models::{MatchCandidate, UploadedDocument, merge};
use crate::search::{
    FanOutOutcome, FanOutSettings, GoogleSearch, SearchCredentials, SearchProvider,
    SimulatedSearch, search_across_chunks,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanError {
    #[error("no content to analyze")]
    NoContent,
}

#[derive(Error, Debug)]
#[error("unknown scan method {0:?}, expected \"web\" or \"corpus\"")]
pub struct UnknownMethod(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanMethod {
    WebSearch,
    Corpus,
}

impl FromStr for ScanMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" | "webSearch" => Ok(Self::WebSearch),
            "corpus" => Ok(Self::Corpus),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ScanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebSearch => write!(f, "webSearch"),
            Self::Corpus => write!(f, "corpus"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Corpus collection; the store's default when `None` or unknown.
    pub collection: Option<String>,
    pub uploaded_documents: Vec<UploadedDocument>,
    pub search_credentials: Option<SearchCredentials>,
}

/// Degraded-mode signal attached to a [`ScanResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    MissingCredentials,
    ProviderUnavailable,
    DocumentSkipped { name: String, reason: String },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => {
                write!(f, "search credentials missing, web results are simulated")
            }
            Self::ProviderUnavailable => write!(f, "search provider unavailable"),
            Self::DocumentSkipped { name, reason } => {
                write!(f, "document {name} skipped: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    /// Best first, at most `display_limit` entries.
    pub matches: Vec<MatchCandidate>,
    pub overall_percentage: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScanWarning>,
}

pub struct Scanner {
    config: Arc<Config>,
    corpus: Arc<dyn CorpusStore>,
    provider: Arc<dyn SearchProvider>,
    fallback: SimulatedSearch,
}

impl Scanner {
    pub fn new(
        config: Arc<Config>,
        corpus: Arc<dyn CorpusStore>,
        provider: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            config,
            corpus,
            provider,
            fallback: SimulatedSearch::new(),
        }
    }

    /// Scanner over the configured corpus (or the built-in one) and the
    /// Google provider.
    pub fn from_config(config: Config) -> Result<Self> {
        let corpus = StaticCorpus::from_config(&config.corpus)?;
        let provider = GoogleSearch::new(&config.search.endpoint, config.search.timeout())?;

        Ok(Self::new(
            Arc::new(config),
            Arc::new(corpus),
            Arc::new(provider),
        ))
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn scan(
        &self,
        text: &str,
        method: ScanMethod,
        options: ScanOptions,
    ) -> Result<ScanResult, ScanError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ScanError::NoContent);
        }
        info!(
            "Scanning {} chars via {method} ({} uploaded documents)",
            text.chars().count(),
            options.uploaded_documents.len()
        );

        let mut warnings = Vec::new();
        let finder = MatchFinder::new(
            &self.config.matching,
            self.config.chunking.compare_chunk_tokens,
        );

        let mut found = match method {
            ScanMethod::WebSearch => {
                self.web_matches(text, options.search_credentials.as_ref(), &mut warnings)
                    .await
            }
            ScanMethod::Corpus => {
                let collection = options
                    .collection
                    .as_deref()
                    .unwrap_or(&self.config.corpus.default_collection);
                finder.find_corpus_matches(text, &self.corpus.records_for(collection))
            }
        };

        if !options.uploaded_documents.is_empty() {
            found.extend(finder.find_document_matches(text, &options.uploaded_documents));
        }

        let mut matches = merge(found);
        let overall_percentage = aggregate(&matches, &self.config.aggregate);
        matches.truncate(self.config.display_limit);

        for w in &warnings {
            warn!("{w}");
        }
        info!(
            "Scan finished: {} matches shown, overall {overall_percentage}%",
            matches.len()
        );

        Ok(ScanResult {
            matches,
            overall_percentage,
            warnings,
        })
    }

    async fn web_matches(
        &self,
        text: &str,
        credentials: Option<&SearchCredentials>,
        warnings: &mut Vec<ScanWarning>,
    ) -> Vec<MatchCandidate> {
        let settings = FanOutSettings::from_config(&self.config);

        if let Some(credentials) = credentials.filter(|c| c.is_complete()) {
            match search_across_chunks(text, self.provider.as_ref(), credentials, &settings).await
            {
                FanOutOutcome::Completed(matches) => return matches,
                FanOutOutcome::ProviderUnavailable => {
                    warnings.push(ScanWarning::ProviderUnavailable);
                }
            }
        } else {
            warnings.push(ScanWarning::MissingCredentials);
        }

        if !self.config.search.fallback_on_failure {
            return Vec::new();
        }

        let anonymous = SearchCredentials {
            api_key: String::new(),
            search_engine_id: String::new(),
        };
        match search_across_chunks(text, &self.fallback, &anonymous, &settings).await {
            FanOutOutcome::Completed(matches) => matches,
            FanOutOutcome::ProviderUnavailable => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchOrigin;
    use crate::search::{ProviderError, SearchHit};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ML: &str = "Machine learning is a branch of artificial intelligence and computer \
        science which focuses on the use of data and algorithms to imitate the way that humans \
        learn, gradually improving its accuracy.";

    const UNRELATED: &str = "Octopuses rearrange pebbles beneath moonlit tidal pools while \
        sleepy herons ponder distant marsh reeds.";

    struct FailingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for FailingProvider {
        async fn search(
            &self,
            _query: &str,
            _credentials: &SearchCredentials,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Quota("daily limit".to_string()))
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl SearchProvider for EchoProvider {
        async fn search(
            &self,
            query: &str,
            _credentials: &SearchCredentials,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            Ok(vec![SearchHit {
                url: "https://echo.example/page".to_string(),
                title: "Echo".to_string(),
                snippet: query.to_string(),
            }])
        }
    }

    fn scanner_with(config: Config, provider: Arc<dyn SearchProvider>) -> Scanner {
        Scanner::new(Arc::new(config), Arc::new(StaticCorpus::seeded()), provider)
    }

    fn scanner() -> Scanner {
        scanner_with(
            Config::default(),
            Arc::new(FailingProvider {
                calls: AtomicUsize::new(0),
            }),
        )
    }

    fn creds() -> SearchCredentials {
        SearchCredentials {
            api_key: "key".to_string(),
            search_engine_id: "cx".to_string(),
        }
    }

    fn corpus_options(collection: &str) -> ScanOptions {
        ScanOptions {
            collection: Some(collection.to_string()),
            ..ScanOptions::default()
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("web".parse::<ScanMethod>().unwrap(), ScanMethod::WebSearch);
        assert_eq!("webSearch".parse::<ScanMethod>().unwrap(), ScanMethod::WebSearch);
        assert_eq!("corpus".parse::<ScanMethod>().unwrap(), ScanMethod::Corpus);
        assert!("bing".parse::<ScanMethod>().is_err());
        assert_eq!(ScanMethod::WebSearch.to_string(), "webSearch");
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let err = scanner()
            .scan("  \n\t ", ScanMethod::Corpus, ScanOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ScanError::NoContent);
        assert_eq!(err.to_string(), "no content to analyze");
    }

    #[tokio::test]
    async fn test_corpus_scan_finds_research_match() {
        let result = scanner()
            .scan(ML, ScanMethod::Corpus, corpus_options("research"))
            .await
            .unwrap();

        assert!(!result.matches.is_empty());
        assert!(result.matches[0].similarity > 30.0);
        assert!(result.overall_percentage > 0);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_corpus_scan_no_match() {
        let result = scanner()
            .scan(UNRELATED, ScanMethod::Corpus, corpus_options("books"))
            .await
            .unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.overall_percentage, 0);
    }

    #[tokio::test]
    async fn test_unknown_collection_uses_default() {
        let text = "Climate change refers to long-term shifts in temperatures and weather \
                    patterns, mainly driven by human activities.";
        let unknown = scanner()
            .scan(text, ScanMethod::Corpus, corpus_options("no-such-collection"))
            .await
            .unwrap();
        let default = scanner()
            .scan(text, ScanMethod::Corpus, ScanOptions::default())
            .await
            .unwrap();
        assert_eq!(unknown, default);
    }

    #[tokio::test]
    async fn test_web_scan_without_credentials_falls_back() {
        let result = scanner()
            .scan(ML, ScanMethod::WebSearch, ScanOptions::default())
            .await
            .unwrap();

        assert_eq!(result.warnings, vec![ScanWarning::MissingCredentials]);
        assert!(!result.matches.is_empty());
        assert!(result.matches.iter().all(|m| m.origin == MatchOrigin::Simulated));
        assert_eq!(
            result.matches[0].source_url,
            "https://en.wikipedia.org/wiki/Machine_learning"
        );
        assert!(result.overall_percentage > 0);
    }

    #[tokio::test]
    async fn test_web_scan_provider_down_falls_back() {
        let provider = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let scanner = scanner_with(Config::default(), provider.clone());
        let options = ScanOptions {
            search_credentials: Some(creds()),
            ..ScanOptions::default()
        };
        let result = scanner.scan(ML, ScanMethod::WebSearch, options).await.unwrap();

        assert!(provider.calls.load(Ordering::SeqCst) >= 1);
        assert_eq!(result.warnings, vec![ScanWarning::ProviderUnavailable]);
        assert!(result.matches.iter().all(|m| m.origin == MatchOrigin::Simulated));
    }

    #[tokio::test]
    async fn test_web_scan_blank_credentials_treated_as_missing() {
        let provider = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let scanner = scanner_with(Config::default(), provider.clone());
        let options = ScanOptions {
            search_credentials: Some(SearchCredentials {
                api_key: String::new(),
                search_engine_id: "cx".to_string(),
            }),
            ..ScanOptions::default()
        };
        let result = scanner.scan(ML, ScanMethod::WebSearch, options).await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.warnings, vec![ScanWarning::MissingCredentials]);
        assert!(result.matches.iter().all(|m| m.origin == MatchOrigin::Simulated));
    }

    #[tokio::test]
    async fn test_web_scan_fallback_disabled() {
        let mut config = Config::default();
        config.search.fallback_on_failure = false;
        let scanner = scanner_with(
            config,
            Arc::new(FailingProvider {
                calls: AtomicUsize::new(0),
            }),
        );
        let options = ScanOptions {
            search_credentials: Some(creds()),
            uploaded_documents: vec![UploadedDocument::new("essay.txt", ML)],
            ..ScanOptions::default()
        };
        let result = scanner.scan(ML, ScanMethod::WebSearch, options).await.unwrap();

        assert_eq!(result.warnings, vec![ScanWarning::ProviderUnavailable]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].origin, MatchOrigin::Document);
    }

    #[tokio::test]
    async fn test_web_scan_with_working_provider() {
        let scanner = scanner_with(Config::default(), Arc::new(EchoProvider));
        let options = ScanOptions {
            search_credentials: Some(creds()),
            ..ScanOptions::default()
        };
        let result = scanner.scan(ML, ScanMethod::WebSearch, options).await.unwrap();

        assert!(result.warnings.is_empty());
        // every chunk echoes back under the same URL
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].origin, MatchOrigin::Web);
    }

    #[tokio::test]
    async fn test_documents_merged_and_truncated() {
        let mut config = Config::default();
        config.display_limit = 1;
        let scanner = scanner_with(config, Arc::new(EchoProvider));
        let options = ScanOptions {
            collection: Some("academic".to_string()),
            uploaded_documents: vec![UploadedDocument::new("essay.txt", ML)],
            ..ScanOptions::default()
        };
        let result = scanner.scan(ML, ScanMethod::Corpus, options).await.unwrap();

        // both sources score the cap; the corpus record was found first
        assert_eq!(result.matches.len(), 1);
        assert_eq!(
            result.matches[0].source_url,
            "https://example.com/document/academic/1"
        );
        // the percentage still counts the truncated document match
        assert_eq!(result.overall_percentage, 95);
    }

    #[tokio::test]
    async fn test_scan_deterministic() {
        let options = || ScanOptions {
            uploaded_documents: vec![UploadedDocument::new("essay.txt", ML)],
            ..ScanOptions::default()
        };
        let first = scanner()
            .scan(ML, ScanMethod::WebSearch, options())
            .await
            .unwrap();
        let second = scanner()
            .scan(ML, ScanMethod::WebSearch, options())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_warning_serialization() {
        let json = serde_json::to_string(&ScanWarning::DocumentSkipped {
            name: "a.pdf".to_string(),
            reason: "broken".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"document_skipped","name":"a.pdf","reason":"broken"}"#);
    }
}
