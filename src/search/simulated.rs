/// Deterministic stand-in for a real search provider.
///
/// Used when no credentials are configured or the real provider is down, so
/// callers still get results with the usual shape. Output depends only on
/// the query: topic keywords select canned pages, anything else gets two
/// generic pages whose URLs are derived from a hash of the query.
use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;

use super::{ProviderError, SearchCredentials, SearchHit, SearchProvider};
use crate::models::MatchOrigin;

struct Topic {
    keywords: &'static [&'static str],
    pages: &'static [(&'static str, &'static str, &'static str)],
}

// (url, title, snippet)
const TOPICS: &[Topic] = &[
    Topic {
        keywords: &["machine learning", "artificial intelligence"],
        pages: &[
            (
                "https://en.wikipedia.org/wiki/Machine_learning",
                "Machine learning - Wikipedia",
                "Machine learning is a branch of artificial intelligence and computer science \
                 which focuses on the use of data and algorithms to imitate the way that humans \
                 learn, gradually improving its accuracy.",
            ),
            (
                "https://www.ibm.com/cloud/learn/machine-learning",
                "What is Machine Learning? | IBM",
                "Machine learning is a form of AI that enables a system to learn from data rather \
                 than through explicit programming.",
            ),
        ],
    },
    Topic {
        keywords: &["climate change", "global warming"],
        pages: &[
            (
                "https://www.un.org/en/climatechange",
                "Climate Change | United Nations",
                "Climate change refers to long-term shifts in temperatures and weather patterns. \
                 These shifts may be natural, but since the 1800s, human activities have been the \
                 main driver of climate change, primarily due to the burning of fossil fuels.",
            ),
            (
                "https://climate.nasa.gov/",
                "Climate Change: Vital Signs of the Planet - NASA",
                "The current warming trend is of particular significance because it is \
                 unequivocally the result of human activity since the mid-20th century.",
            ),
        ],
    },
    Topic {
        keywords: &["web development", "frontend"],
        pages: &[
            (
                "https://developer.mozilla.org/en-US/docs/Learn",
                "Learn web development | MDN",
                "Modern web development encompasses a variety of technologies and methodologies \
                 including responsive design, progressive web apps, and component-based \
                 architecture.",
            ),
            (
                "https://www.w3schools.com/",
                "W3Schools Online Web Tutorials",
                "Web development refers to building, creating, and maintaining websites. It \
                 includes aspects such as web design, web publishing, web programming, and \
                 database management.",
            ),
        ],
    },
];

const TITLE_PREVIEW_CHARS: usize = 30;

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedSearch;

impl SimulatedSearch {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hits for `query`; pure function of the query text.
    pub fn hits_for(&self, query: &str) -> Vec<SearchHit> {
        let normalized = crate::text::normalize(query);

        if let Some(topic) = TOPICS
            .iter()
            .find(|t| t.keywords.iter().any(|k| normalized.contains(k)))
        {
            return topic
                .pages
                .iter()
                .map(|&(url, title, snippet)| SearchHit {
                    url: url.to_string(),
                    title: title.to_string(),
                    snippet: snippet.to_string(),
                })
                .collect();
        }

        generic_hits(&normalized)
    }
}

fn query_id(query: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    query.hash(&mut hasher);
    hasher.finish() % 1000
}

fn title_preview(query: &str) -> String {
    match query.char_indices().nth(TITLE_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &query[..idx]),
        None => query.to_string(),
    }
}

fn generic_hits(normalized: &str) -> Vec<SearchHit> {
    let id = query_id(normalized);
    let terms: Vec<&str> = normalized.split(' ').take(5).collect();
    let preview = title_preview(normalized);

    vec![
        SearchHit {
            url: format!("https://example.com/result-{id}"),
            title: format!("Search Result for \"{preview}\""),
            snippet: format!(
                "This is a simulated search result for your query. A configured search \
                 provider would return a matching passage from the web here. Terms: {}.",
                terms.join(", ")
            ),
        },
        SearchHit {
            url: format!("https://example.org/result-{id}"),
            title: format!("Related Information on \"{preview}\""),
            snippet: "Another simulated result showing how matches found on the web are \
                      listed alongside their similarity scores."
                .to_string(),
        },
    ]
}

#[async_trait]
impl SearchProvider for SimulatedSearch {
    async fn search(
        &self,
        query: &str,
        _credentials: &SearchCredentials,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        Ok(self.hits_for(query))
    }

    fn origin(&self) -> MatchOrigin {
        MatchOrigin::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_hits() {
        let hits = SimulatedSearch::new().hits_for("A primer on Machine Learning methods");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://en.wikipedia.org/wiki/Machine_learning");
    }

    #[test]
    fn test_topic_keyword_across_whitespace() {
        let hits = SimulatedSearch::new().hits_for("effects of global\n  warming");
        assert_eq!(hits[0].url, "https://www.un.org/en/climatechange");
    }

    #[test]
    fn test_generic_hits_deterministic() {
        let search = SimulatedSearch::new();
        let a = search.hits_for("medieval castle architecture in northern europe");
        let b = search.hits_for("medieval castle architecture in northern europe");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert!(a[0].url.starts_with("https://example.com/result-"));
        assert!(a[0].snippet.contains("medieval, castle, architecture, in, northern"));
        assert!(a[0].title.ends_with("...\""));
    }

    #[test]
    fn test_urls_unique_per_query() {
        let hits = SimulatedSearch::new().hits_for("baroque counterpoint");
        assert_ne!(hits[0].url, hits[1].url);
    }

    #[tokio::test]
    async fn test_provider_never_fails() {
        let creds = SearchCredentials {
            api_key: String::new(),
            search_engine_id: String::new(),
        };
        let hits = SimulatedSearch::new().search("anything", &creds).await.unwrap();
        assert!(!hits.is_empty());
        assert_eq!(SimulatedSearch::new().origin(), MatchOrigin::Simulated);
    }
}
