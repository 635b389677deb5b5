use std::sync::Arc;

use wishly_db::store::Store;

use crate::config::ServerConfig;
use crate::engagement::EngagementService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage adapter (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Engagement operations bound to this state's store and name-match policy.
    pub fn engagement(&self) -> EngagementService<'_> {
        EngagementService::new(self.store.as_ref(), self.config.unreserve_match)
    }
}
