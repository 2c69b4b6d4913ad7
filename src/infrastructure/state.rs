//! Shared application state for the relay

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::session::SessionManager;

/// State shared across all relay connections
pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<RwLock<SessionManager>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions = Arc::new(RwLock::new(SessionManager::new(config.chronicle_capacity)));
        Self { config, sessions }
    }
}
