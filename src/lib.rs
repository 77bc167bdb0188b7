pub mod config;
pub mod controllers;
pub mod directory;
pub mod engine;
pub mod inventory;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// Shared state for the whole application
pub struct AppState {
    pub engine: engine::ReservationEngine,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let store = store::JsonStore::open(&config.storage.data_dir).await?;
        let policy = engine::SharedKeyPolicy::new(config.admin.key.clone());
        let engine =
            engine::ReservationEngine::open(store, config.engine_settings(), Box::new(policy))
                .await?;
        Ok(Arc::new(Self { engine, config }))
    }
}

/// The full application router; split out of `main` so tests can drive it
/// without a socket.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seatline API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
