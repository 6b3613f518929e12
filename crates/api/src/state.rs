use std::sync::Arc;

use reel_core::store::MovieStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; handlers only ever see the store through the
/// [`MovieStore`] trait, never the concrete backend.
#[derive(Clone)]
pub struct AppState {
    /// The movie backend selected at start-up.
    pub store: Arc<dyn MovieStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
