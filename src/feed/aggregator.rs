use crate::config::{Config, SourceMode};
use crate::error::Result;
use crate::models::{Entry, EntrySource};
use crate::store::{Query, RecordStore, RestStore};

use super::{join_all_settled, normalize};

/// Rows requested from each collection when both are merged.
pub const DUAL_SOURCE_LIMIT: usize = 60;
/// Rows requested when only diary summaries are shown.
pub const SINGLE_SOURCE_LIMIT: usize = 120;

pub struct Aggregator<S> {
    store: S,
    mode: SourceMode,
    summary_collection: String,
    novel_collection: String,
}

impl Aggregator<RestStore> {
    /// Fails with a configuration error, before any query, when no store is set up.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = config.store_settings()?;
        let store = RestStore::new(&settings)?;
        Ok(Self::new(store, config))
    }
}

impl<S: RecordStore> Aggregator<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            mode: config.mode,
            summary_collection: config.summary_collection.clone(),
            novel_collection: config.novel_collection.clone(),
        }
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Queries every configured collection and returns one feed, newest first.
    ///
    /// All-or-nothing: if any collection fails, the whole fetch fails with that
    /// error and rows from the other collection are dropped.
    pub async fn fetch_all(&self) -> Result<Vec<Entry>> {
        let sources = match self.mode {
            SourceMode::Dual => vec![
                (self.summary_collection.as_str(), EntrySource::Summary, DUAL_SOURCE_LIMIT),
                (self.novel_collection.as_str(), EntrySource::Novel, DUAL_SOURCE_LIMIT),
            ],
            SourceMode::Single => vec![(
                self.summary_collection.as_str(),
                EntrySource::Summary,
                SINGLE_SOURCE_LIMIT,
            )],
        };

        let batches = join_all_settled(
            sources
                .into_iter()
                .map(|(collection, source, limit)| self.fetch_source(collection, source, limit)),
        )
        .await?;

        Ok(merge_by_date(batches.into_iter().flatten().collect()))
    }

    async fn fetch_source(
        &self,
        collection: &str,
        source: EntrySource,
        limit: usize,
    ) -> Result<Vec<Entry>> {
        let rows = self
            .store
            .query(collection, &Query::public_feed(limit))
            .await
            .inspect_err(|e| tracing::warn!("Failed to query {}: {}", collection, e))?;

        tracing::debug!("Fetched {} rows from {}", rows.len(), collection);

        Ok(rows.into_iter().map(|raw| normalize(raw, source)).collect())
    }
}

/// Sorts newest first, undated entries last. The sort is stable, so equal
/// dates keep their input order.
pub fn merge_by_date(mut entries: Vec<Entry>) -> Vec<Entry> {
    // `None` orders below every date, so descending puts it at the end.
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}
