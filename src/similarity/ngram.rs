use std::collections::BTreeSet;

use super::rescale;
use crate::text::significant_tokens;

/// Phrase length compared by the overlap measure.
pub const NGRAM_SIZE: usize = 3;

const EXPONENT: f64 = 0.7;
const SCALE: f64 = 100.0;

/// Set of contiguous `n`-token phrases over the significant tokens of `text`.
pub fn ngrams(text: &str, n: usize) -> BTreeSet<String> {
    let toks = significant_tokens(text);
    if n == 0 {
        return BTreeSet::new();
    }
    toks.windows(n).map(|w| w.join(" ")).collect()
}

/// Raw Jaccard coefficient of two sets, 0 when both are empty.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Phrase-overlap score in `[0, SCORE_CAP]`.
pub fn ngram_similarity(a: &str, b: &str) -> f64 {
    let ratio = jaccard(&ngrams(a, NGRAM_SIZE), &ngrams(b, NGRAM_SIZE));
    rescale(ratio, EXPONENT, SCALE)
}
