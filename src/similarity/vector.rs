use std::collections::BTreeMap;

use super::rescale;
use crate::text::significant_tokens;

const EXPONENT: f64 = 0.5;
const SCALE: f64 = 120.0;

/// Number of documents the idf factor is computed over: the two spans.
const PSEUDO_CORPUS_SIZE: f64 = 2.0;

/// Term counts over the significant tokens of `text`.
pub fn term_frequencies(text: &str) -> BTreeMap<String, usize> {
    let mut tf = BTreeMap::new();
    for tok in significant_tokens(text) {
        *tf.entry(tok).or_insert(0) += 1;
    }
    tf
}

/// Builds the two tf-idf vectors over the union vocabulary of `a` and `b`.
///
/// Frequencies are divided by each span's maximum frequency and weighted by
/// `ln(2 / df)`, so a term present in both spans carries no weight.
pub fn weighted_vectors(a: &str, b: &str) -> (BTreeMap<String, f64>, BTreeMap<String, f64>) {
    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);

    let max_a = tf_a.values().copied().max().unwrap_or(1).max(1) as f64;
    let max_b = tf_b.values().copied().max().unwrap_or(1).max(1) as f64;

    let mut vec_a = BTreeMap::new();
    let mut vec_b = BTreeMap::new();

    let vocabulary = tf_a.keys().chain(tf_b.keys());
    for term in vocabulary {
        if vec_a.contains_key(term) {
            continue;
        }
        let in_a = tf_a.get(term).copied().unwrap_or(0);
        let in_b = tf_b.get(term).copied().unwrap_or(0);
        let df = usize::from(in_a > 0) + usize::from(in_b > 0);
        let idf = (PSEUDO_CORPUS_SIZE / df as f64).ln();

        vec_a.insert(term.clone(), in_a as f64 / max_a * idf);
        vec_b.insert(term.clone(), in_b as f64 / max_b * idf);
    }

    (vec_a, vec_b)
}

/// Cosine of two sparse vectors keyed by term; 0 when either has no magnitude.
pub fn cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let mag_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let mag_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    (dot / (mag_a * mag_b)).clamp(0.0, 1.0)
}

/// Weighted-term score in `[0, SCORE_CAP]`.
pub fn vector_similarity(a: &str, b: &str) -> f64 {
    let (vec_a, vec_b) = weighted_vectors(a, b);
    rescale(cosine(&vec_a, &vec_b), EXPONENT, SCALE)
}
