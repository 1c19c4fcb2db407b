/// Named, read-only document collections.
///
/// Collections are loaded once at start-up and shared behind `Arc`; nothing
/// here is mutated after construction.
mod seed;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CorpusConfig;

/// Collection used when a caller names none or an unknown one.
pub const DEFAULT_COLLECTION: &str = "academic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    pub collection: String,
}

/// Lookup of records by collection name.
///
/// Never fails: unknown names resolve to the store's default collection.
pub trait CorpusStore: Send + Sync {
    fn records_for(&self, collection: &str) -> Vec<CorpusRecord>;

    /// Names of every collection the store holds.
    fn collections(&self) -> Vec<String>;
}

/// In-memory [`CorpusStore`].
#[derive(Debug, Clone)]
pub struct StaticCorpus {
    collections: BTreeMap<String, Vec<CorpusRecord>>,
    default_collection: String,
}

impl StaticCorpus {
    /// Groups `records` by their `collection` field.
    pub fn from_records(
        records: impl IntoIterator<Item = CorpusRecord>,
        default_collection: impl Into<String>,
    ) -> Self {
        let mut collections: BTreeMap<String, Vec<CorpusRecord>> = BTreeMap::new();
        for record in records {
            collections
                .entry(record.collection.clone())
                .or_default()
                .push(record);
        }
        Self {
            collections,
            default_collection: default_collection.into(),
        }
    }

    /// The built-in collections: academic, research, educational,
    /// assignments and books.
    pub fn seeded() -> Self {
        Self::from_records(seed::records(), DEFAULT_COLLECTION)
    }

    /// Loads records from a JSON array of `{id, title, text, collection}`.
    pub fn from_json_file(path: &Path, default_collection: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus: {}", path.display()))?;
        let records: Vec<CorpusRecord> = serde_json::from_str(&data)
            .with_context(|| format!("invalid corpus JSON: {}", path.display()))?;

        let corpus = Self::from_records(records, default_collection);
        anyhow::ensure!(
            corpus.collections.contains_key(default_collection),
            "corpus {} has no records in default collection {default_collection:?}",
            path.display()
        );
        info!(
            "Loaded {} collections from {}",
            corpus.collections.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// The JSON corpus named in `config`, or the built-in one.
    pub fn from_config(config: &CorpusConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_json_file(Path::new(path), &config.default_collection),
            None => Ok(Self::seeded()),
        }
    }

    #[must_use]
    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    /// Number of records per collection, ordered by name.
    #[must_use]
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.collections
            .iter()
            .map(|(name, records)| (name.clone(), records.len()))
            .collect()
    }
}

impl CorpusStore for StaticCorpus {
    fn records_for(&self, collection: &str) -> Vec<CorpusRecord> {
        match self.collections.get(collection) {
            Some(records) => records.clone(),
            None => {
                debug!(
                    "Unknown collection {collection:?}, using {:?}",
                    self.default_collection
                );
                self.collections
                    .get(&self.default_collection)
                    .cloned()
                    .unwrap_or_default()
            }
        }
    }

    fn collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }
}
