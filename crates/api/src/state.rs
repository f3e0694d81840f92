use std::sync::Arc;

use devloop_core::config::DevLoopConfig;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::scripting::orchestrator::ScriptOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: devloop_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The loaded `config.json`, replaced wholesale on save.
    pub settings: Arc<RwLock<DevLoopConfig>>,
    /// Runs scripts and records their history.
    pub orchestrator: Arc<ScriptOrchestrator>,
}

impl AppState {
    pub fn new(pool: devloop_db::DbPool, config: ServerConfig, settings: DevLoopConfig) -> Self {
        Self {
            orchestrator: Arc::new(ScriptOrchestrator::new(pool.clone())),
            pool,
            config: Arc::new(config),
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}
