use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;

use nippo_core::health::{healthz, readiness};
use nippo_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::controller::front_controller;
use crate::state::AppState;

/// Handler for `GET /readyz`: ready once the database answers.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness("database", state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Front controller
        .route("/", get(front_controller).post(front_controller))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
