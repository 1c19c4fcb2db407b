use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::similarity::SCORE_CAP;

/// Where a match was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    Web,
    Simulated,
    Corpus,
    Document,
}

/// One source overlapping with the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Unique within one scan result.
    pub source_url: String,
    pub title: String,
    /// Score in `[0, 100]`.
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub origin: MatchOrigin,
}

/// An uploaded document after text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub name: String,
    pub text: String,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Drops every candidate whose URL was already seen; the first one wins.
pub fn dedup_by_url(matches: Vec<MatchCandidate>) -> Vec<MatchCandidate> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.source_url.clone()))
        .collect()
}

/// Stable sort, highest similarity first; ties keep discovery order.
pub fn rank(matches: &mut [MatchCandidate]) {
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}

/// Dedup then rank. Every merge point in the pipeline goes through here.
pub fn merge(matches: Vec<MatchCandidate>) -> Vec<MatchCandidate> {
    let mut merged = dedup_by_url(matches);
    rank(&mut merged);
    merged
}

/// Clamps a computed score into the reportable range.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, SCORE_CAP)
}

/// Cuts `text` to at most `max_chars` characters, appending `...` if cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", text[..byte_idx].trim_end()),
        None => text.to_string(),
    }
}
