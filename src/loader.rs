//! Memoizing dataset loader.
//!
//! Parsed datasets are cached per source identity for the lifetime of the
//! loader, so re-running an analysis with other parameters never refetches.

use crate::model::{LoadError, OrderRecord};
use crate::parser::{OrdersCsvParser, Parser};
use crate::source::DatasetSource;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A fully parsed order table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub identity: String,
    pub records: Vec<OrderRecord>,
}

impl Dataset {
    /// Distinct regions in first-seen order.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = Vec::new();
        for record in &self.records {
            if !regions.contains(&record.region) {
                regions.push(record.region.clone());
            }
        }
        regions
    }

    /// Region selector options: the `All` sentinel followed by every region.
    pub fn region_options(&self) -> Vec<String> {
        let mut options = vec![crate::normalizer::ALL_REGIONS.to_string()];
        options.extend(self.regions());
        options
    }
}

pub struct DatasetLoader {
    parser: OrdersCsvParser,
    cache: Mutex<HashMap<String, Arc<Dataset>>>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            parser: OrdersCsvParser::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached dataset for `source`, fetching and parsing it on first use.
    pub async fn load(&self, source: &dyn DatasetSource) -> Result<Arc<Dataset>, LoadError> {
        let identity = source.identity();

        // Held across the fetch so concurrent callers for one source fetch once.
        let mut cache = self.cache.lock().await;
        if let Some(dataset) = cache.get(&identity) {
            info!(source = %identity, "Dataset cache hit");
            return Ok(dataset.clone());
        }

        info!(source = %identity, "Loading dataset");
        let raw = source.fetch().await?;
        let records = self.parser.parse(&raw).map_err(|source| LoadError::Parse {
            identity: identity.clone(),
            source,
        })?;
        info!(source = %identity, records = records.len(), "Dataset loaded");

        let dataset = Arc::new(Dataset {
            identity: identity.clone(),
            records,
        });
        cache.insert(identity, dataset.clone());
        Ok(dataset)
    }

    /// Drops the cached entry for one source. Returns whether it was cached.
    pub async fn invalidate(&self, identity: &str) -> bool {
        self.cache.lock().await.remove(identity).is_some()
    }

    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    pub async fn cached_count(&self) -> usize {
        self.cache.lock().await.len()
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}
