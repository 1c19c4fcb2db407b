/// Tokens shorter than this (in chars) carry no signal for overlap scoring.
pub const MIN_SIGNIFICANT_CHARS: usize = 3;

/// Lowercase and collapse all whitespace runs into single spaces.
pub fn normalize(text: &str) -> String {
    tokens(text).join(" ")
}

/// Lowercased whitespace-separated tokens, in order.
pub fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Tokens used by the similarity measures: lowercased, longer than 2 chars.
pub fn significant_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|t| t.chars().count() >= MIN_SIGNIFICANT_CHARS)
        .map(str::to_lowercase)
        .collect()
}
