use std::sync::Arc;

use taskcal_core::cache::CalendarCache;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::todoist::TaskSource;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub tasks: Arc<dyn TaskSource>,
    // Never held across a fetch; concurrent misses both regenerate and the
    // last write wins
    pub cache: Arc<RwLock<CalendarCache>>,
}

impl AppState {
    pub fn new(config: ServerConfig, tasks: Arc<dyn TaskSource>) -> Self {
        let cache = CalendarCache::new(config.cache_ttl());

        AppState {
            config: Arc::new(config),
            tasks,
            cache: Arc::new(RwLock::new(cache)),
        }
    }
}
