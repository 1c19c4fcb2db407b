//! # plagscan: Text Overlap Scanner
//!
//! Estimates how much of a submitted text overlaps with web pages, a static
//! reference corpus, or user-uploaded documents, and reports the best
//! matching sources with an overall similarity percentage.
//!
//! ## Architecture
//!
//! - **[`text`]**: Tokenizing, normalization, token and sentence chunking
//! - **[`similarity`]**: 3-gram Jaccard and TF-IDF cosine scoring
//! - **[`corpus`]**: Named read-only reference collections
//! - **[`matcher`]**: Corpus and uploaded-document matching
//! - **[`search`]**: Search providers (Google, simulated) and chunked fan-out
//! - **[`aggregate`]**: Overall percentage from weighted top matches
//! - **[`scan`]**: The `Scanner::scan` surface wiring everything together
//! - **[`extract`]**: Plain text from txt/md, PDF, DOCX and HTML files
//! - **[`config`]**: Configuration loading and validation
//! - **[`models`]**: Match types and the dedup/ranking rules

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod extract;
pub mod matcher;
pub mod models;
pub mod scan;
pub mod search;
pub mod similarity;
pub mod text;

pub use scan::{ScanError, ScanMethod, ScanOptions, ScanResult, ScanWarning, Scanner};
