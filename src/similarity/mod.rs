/// Pairwise text similarity.
///
/// Two measures are computed and the larger one wins: a phrase-level 3-gram
/// Jaccard overlap ([`ngram`]) and a tf-idf cosine over single terms
/// ([`vector`]). Both are rescaled with a concave power curve so that partial
/// overlap reads higher than the raw ratio, and both are capped at
/// [`SCORE_CAP`].
pub mod ngram;
pub mod vector;

use crate::text::Chunk;

pub use ngram::ngram_similarity;
pub use vector::vector_similarity;

/// No pairwise score ever exceeds this.
pub const SCORE_CAP: f64 = 95.0;

/// `round(ratio^exponent * scale)`, capped at [`SCORE_CAP`].
fn rescale(ratio: f64, exponent: f64, scale: f64) -> f64 {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    (ratio.powf(exponent) * scale).round().min(SCORE_CAP)
}

/// Similarity of two spans in `[0, SCORE_CAP]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    ngram_similarity(a, b).max(vector_similarity(a, b))
}

/// Best score of any chunk against `candidate`; 0 for no chunks.
pub fn best_chunk_similarity(chunks: &[Chunk], candidate: &str) -> f64 {
    chunks
        .iter()
        .map(|chunk| similarity(&chunk.content, candidate))
        .fold(0.0, f64::max)
}
