/// Text normalization and chunking.
///
/// Everything in here is a pure function of its input: no caching, no I/O.
pub mod chunker;
pub mod tokenize;

pub use chunker::{Chunk, chunk_by_sentences, chunk_by_tokens};
pub use tokenize::{normalize, significant_tokens, tokens};
