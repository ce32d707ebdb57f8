use crate::models::Pharmacy;
use crate::services::source::PharmacyLoader;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const DATASET_KEY: &str = "pharmacies";

/// In-memory cache of the pharmacy data set
///
/// The set is loaded on first use and kept for `ttl_secs`; concurrent
/// requests during a load wait for the same load instead of starting their own.
pub struct DatasetCache {
    loader: PharmacyLoader,
    cache: moka::future::Cache<String, Arc<Vec<Pharmacy>>>,
    ttl_secs: u64,
}

impl DatasetCache {
    /// Create a new data set cache
    pub fn new(loader: PharmacyLoader, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            loader,
            cache,
            ttl_secs,
        }
    }

    /// Get the data set, loading it on a miss
    pub async fn get_or_load(&self) -> Arc<Vec<Pharmacy>> {
        self.cache
            .get_with(DATASET_KEY.to_string(), async {
                tracing::debug!("Data set cache miss, loading from {:?}", self.loader.source());
                Arc::new(self.loader.load().await)
            })
            .await
    }

    /// Drop the cached set so the next access reloads it
    pub async fn invalidate(&self) {
        self.cache.invalidate(DATASET_KEY).await;
        tracing::debug!("Invalidated pharmacy data set");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}
