use std::sync::Arc;

use sams_client::AssetService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The asset
/// service is injected at construction so tests can substitute a double.
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream SAMS asset-management service.
    pub assets: Arc<dyn AssetService>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
