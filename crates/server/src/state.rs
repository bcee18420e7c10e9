use std::sync::Arc;

use reconciler_core::{Config, QualityExclusionFilter, ResultCache};

/// Shared application state
pub struct AppState {
    config: Config,
    filter: QualityExclusionFilter,
    cache: Option<Arc<dyn ResultCache>>,
}

impl AppState {
    pub fn new(config: Config, cache: Option<Arc<dyn ResultCache>>) -> Self {
        let filter = QualityExclusionFilter::from_config(&config.filter);
        Self {
            config,
            filter,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn filter(&self) -> &QualityExclusionFilter {
        &self.filter
    }

    pub fn cache(&self) -> Option<Arc<dyn ResultCache>> {
        self.cache.clone()
    }
}
