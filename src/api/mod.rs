pub mod rest;
pub mod websocket;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use crate::services::Dashboard;

pub use rest::create_rest_router;
pub use websocket::ws_handler;

pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Page, JSON API and push channel on one router.
pub fn create_router(state: Arc<AppState>) -> Router {
    create_rest_router(state.clone())
        .merge(Router::new().route("/ws", get(ws_handler)).with_state(state))
        .layer(CorsLayer::permissive())
}
