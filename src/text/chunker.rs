use std::sync::LazyLock;

use regex::Regex;

use super::tokenize::tokens;

/// Token chunks rendered shorter than this are dropped as noise.
pub const MIN_CHUNK_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub position: usize,
}

fn into_chunks(parts: Vec<String>) -> Vec<Chunk> {
    parts
        .into_iter()
        .enumerate()
        .map(|(position, content)| Chunk { content, position })
        .collect()
}

/// Splits text into chunks of `target_size` lowercased tokens each.
///
/// The last chunk may be shorter. Chunks whose rendered length is below
/// [`MIN_CHUNK_CHARS`] are dropped. A `target_size` of 0 is treated as 1.
pub fn chunk_by_tokens(text: &str, target_size: usize) -> Vec<Chunk> {
    let size = target_size.max(1);
    let toks = tokens(text);

    let parts = toks
        .chunks(size)
        .map(|group| group.join(" "))
        .filter(|rendered| rendered.chars().count() >= MIN_CHUNK_CHARS)
        .collect();

    into_chunks(parts)
}

/// Splits lowercased text into sentences ending with `.`, `!` or `?`.
///
/// Trailing text without a terminator still counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern is valid")
    });

    let normalized = super::tokenize::normalize(text);
    RE.find_iter(&normalized)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Packs whole sentences into chunks of at most `target_chars` characters.
///
/// A sentence is never split; one that is longer than the target on its own
/// becomes a chunk by itself.
pub fn chunk_by_sentences(text: &str, target_chars: usize) -> Vec<Chunk> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let current_len = current.chars().count();
        let sentence_len = sentence.chars().count();

        // +1 for the joining space
        if current_len > 0 && current_len + 1 + sentence_len > target_chars {
            parts.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }

    if !current.is_empty() {
        parts.push(current);
    }

    into_chunks(parts)
}
