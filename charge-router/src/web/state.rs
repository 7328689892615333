//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::StationCatalog;
use crate::ranking::{RankingConfig, RankingCoordinator};

/// Shared application state.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Loaded station snapshot
    pub catalog: Arc<StationCatalog>,

    /// Ranking engine with its configuration
    pub coordinator: Arc<RankingCoordinator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(catalog: StationCatalog, config: RankingConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            coordinator: Arc::new(RankingCoordinator::new(config)),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        self.coordinator.config()
    }
}
