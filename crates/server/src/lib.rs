use std::sync::Arc;

use db::DBService;
use tokio::sync::RwLock;

pub mod analytics;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

use config::Config;

/// Shared handle threaded through every route handler.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(db: DBService, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }
}
