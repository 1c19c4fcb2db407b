/// Matching against corpus records and uploaded documents.
///
/// The query text is split into token chunks and every candidate text is
/// scored by its best-matching chunk. Candidates scoring strictly above the
/// inclusion threshold become [`MatchCandidate`]s.
use std::collections::HashMap;

use tracing::debug;

use crate::config::MatchingConfig;
use crate::corpus::CorpusRecord;
use crate::models::{MatchCandidate, MatchOrigin, UploadedDocument, clamp_score, merge, preview};
use crate::similarity::best_chunk_similarity;
use crate::text::{Chunk, chunk_by_tokens, normalize};

/// Token chunks of `text`, or the whole normalized text as a single chunk
/// when every chunk was too short to keep.
pub fn comparison_chunks(text: &str, chunk_tokens: usize) -> Vec<Chunk> {
    let chunks = chunk_by_tokens(text, chunk_tokens);
    if !chunks.is_empty() {
        return chunks;
    }

    let whole = normalize(text);
    if whole.is_empty() {
        return Vec::new();
    }
    vec![Chunk {
        content: whole,
        position: 0,
    }]
}

/// Stable URL for a corpus record.
pub fn record_url(record: &CorpusRecord) -> String {
    format!(
        "https://example.com/document/{}/{}",
        record.collection, record.id
    )
}

/// Pseudo-URL for an uploaded document.
///
/// `occurrence` counts earlier uploads with the same name; repeats get a
/// numeric suffix so each upload keeps its own URL.
pub fn document_url(name: &str, occurrence: usize) -> String {
    match occurrence {
        0 => format!("#document-{name}"),
        n => format!("#document-{name}-{}", n + 1),
    }
}

pub struct MatchFinder<'a> {
    pub config: &'a MatchingConfig,
    pub chunk_tokens: usize,
}

impl<'a> MatchFinder<'a> {
    pub fn new(config: &'a MatchingConfig, chunk_tokens: usize) -> Self {
        Self {
            config,
            chunk_tokens,
        }
    }

    /// Records overlapping `text` above the corpus threshold, best first.
    pub fn find_corpus_matches(&self, text: &str, records: &[CorpusRecord]) -> Vec<MatchCandidate> {
        let chunks = comparison_chunks(text, self.chunk_tokens);
        if chunks.is_empty() {
            return Vec::new();
        }

        let found = records
            .iter()
            .filter_map(|record| {
                let score = clamp_score(best_chunk_similarity(&chunks, &record.text));
                debug!("Record {}/{} scored {score}", record.collection, record.id);
                (score > self.config.corpus_threshold).then(|| MatchCandidate {
                    source_url: record_url(record),
                    title: record.title.clone(),
                    similarity: score,
                    snippet: Some(preview(&record.text, self.config.snippet_chars)),
                    origin: MatchOrigin::Corpus,
                })
            })
            .collect();

        merge(found)
    }

    /// Uploaded documents overlapping `text` above the document threshold.
    ///
    /// The threshold applies to the raw score; kept scores are multiplied by
    /// the configured boost and capped like every other score.
    pub fn find_document_matches(
        &self,
        text: &str,
        documents: &[UploadedDocument],
    ) -> Vec<MatchCandidate> {
        let chunks = comparison_chunks(text, self.chunk_tokens);
        if chunks.is_empty() {
            return Vec::new();
        }

        let mut seen_names: HashMap<&str, usize> = HashMap::new();
        let found = documents
            .iter()
            .filter_map(|doc| {
                let occurrence = seen_names.entry(doc.name.as_str()).or_default();
                let source_url = document_url(&doc.name, *occurrence);
                *occurrence += 1;

                let raw = best_chunk_similarity(&chunks, &doc.text);
                debug!("Document {} scored {raw}", doc.name);
                (raw > self.config.document_threshold).then(|| MatchCandidate {
                    source_url,
                    title: doc.name.clone(),
                    similarity: clamp_score((raw * self.config.document_boost).round()),
                    snippet: Some(preview(&doc.text, self.config.snippet_chars)),
                    origin: MatchOrigin::Document,
                })
            })
            .collect();

        merge(found)
    }
}
