pub mod fetcher;
pub mod kma;
pub mod mock;
pub mod types;

use moka::future::Cache;
use std::time::Duration;
use types::WindObservation;

pub type WindCache = Cache<String, CachedObservation>;

pub fn init_cache() -> WindCache {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(10 * 60)) // 10 minutes
        .build()
}

#[derive(Clone, Debug)]
pub struct CachedObservation {
    pub observation: WindObservation,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}
