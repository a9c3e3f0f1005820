use std::sync::Arc;

use predlb_cache::config::CacheConfig;
use predlb_cache::{MokaStore, PredictionCache};
use predlb_features::config::DataConfig;
use predlb_predictor::{ProbabilityPredictor, build_predictor};
use predlb_storage::RecordStore;

use crate::config::AppConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub predictor: Arc<dyn ProbabilityPredictor>,
    pub cache: Arc<PredictionCache>,
    pub data: Arc<DataConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<RecordStore>,
        predictor: Arc<dyn ProbabilityPredictor>,
        data: DataConfig,
        cache: &CacheConfig,
        model: &str,
    ) -> Self {
        let data = Arc::new(data);
        let prediction_cache = PredictionCache::new(
            store.clone(),
            Arc::new(MokaStore::new(cache.max_capacity)),
            predictor.clone(),
            data.clone(),
            model,
            cache.ttl(),
        );
        Self {
            store,
            predictor,
            cache: Arc::new(prediction_cache),
            data,
        }
    }

    pub fn from_config(config: &AppConfig) -> eyre::Result<Self> {
        let store = match &config.storage_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "using on-disk record storage");
                RecordStore::on_disk(dir)?
            }
            None => {
                tracing::warn!("no storage_dir configured, records are kept in memory");
                RecordStore::in_memory()
            }
        };
        let store = Arc::new(store);
        let predictor = build_predictor(&config.predictor, store.clone());
        Ok(Self::new(
            store,
            predictor,
            config.data.clone(),
            &config.cache,
            &config.predictor.model_identifier,
        ))
    }
}
