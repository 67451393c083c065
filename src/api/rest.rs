use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::render::{self, ViewSnapshot};
use super::AppState;

/// GET / - server-rendered dashboard
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::render_html(&state.dashboard.snapshot()))
}

/// GET /api/state
async fn get_state(State(state): State<Arc<AppState>>) -> Json<ViewSnapshot> {
    Json(render::snapshot(&state.dashboard.snapshot()))
}

/// POST /api/refresh - 202 when a fetch started, 409 while one is in flight
async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.dashboard.spawn_refresh() {
        (StatusCode::ACCEPTED, Json(serde_json::json!({ "accepted": true })))
    } else {
        (StatusCode::CONFLICT, Json(serde_json::json!({ "accepted": false })))
    }
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/state", get(get_state))
        .route("/api/refresh", post(refresh))
        .route("/health", get(health))
        .with_state(state)
}
