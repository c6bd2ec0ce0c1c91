use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    assets::AssetStore,
    generation::GenerationService,
    poller::Poller,
    prediction::PredictionClient,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    pub assets: Arc<AssetStore>,
}

impl AppState {
    pub fn new(client: PredictionClient, poller: Poller, assets: AssetStore) -> Self {
        Self {
            generation: Arc::new(GenerationService::new(Arc::new(client), poller)),
            assets: Arc::new(assets),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let client = PredictionClient::new(&config.replicate_base_url, config.api_token());
        let poller = Poller::new(config.poll_interval(), config.poll_max_attempts);
        let assets = if config.seed_demo_assets {
            AssetStore::with_demo_assets()
        } else {
            AssetStore::new()
        };
        Self::new(client, poller, assets)
    }
}
