/// Google Custom Search JSON API provider.
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ProviderError, SearchCredentials, SearchHit, SearchProvider};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorBody,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
}

pub struct GoogleSearch {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl GoogleSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("plagscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(
        &self,
        query: &str,
        credentials: &SearchCredentials,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        if credentials.api_key.is_empty() || credentials.search_engine_id.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", credentials.api_key.as_str()),
                ("cx", credentials.search_engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::Network(e.without_url().to_string())
                }
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        parse_response(status, &body)
    }
}

/// Maps an HTTP status and body to hits or a [`ProviderError`].
fn parse_response(status: u16, body: &str) -> Result<Vec<SearchHit>, ProviderError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<GoogleErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        return Err(match status {
            401 | 403 => ProviderError::Auth(message),
            429 => ProviderError::Quota(message),
            _ => ProviderError::Status { status, message },
        });
    }

    let parsed: GoogleResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    Ok(parsed
        .items
        .into_iter()
        .map(|item| SearchHit {
            url: item.link,
            title: item.title,
            snippet: item.snippet,
        })
        .collect())
}
