//! Practice Hub
//!
//! Client-side notification and settings stores for the coding-practice platform, and the
//! notification service they talk to.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod settings;
pub mod stats;
pub mod storage;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::ServiceKey;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the notification service router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let service_key = state.config.api_key.clone().map(ServiceKey::new);

    // A user id and a notification id share the same path position.
    let api_routes = Router::new()
        .route("/notifications", post(api::create_notification))
        .route(
            "/notifications/{id}",
            get(api::list_notifications).delete(api::delete_notification),
        )
        .route("/notifications/{id}/read", put(api::mark_notification_read))
        .route(
            "/notifications/{id}/mark-all-read",
            put(api::mark_all_notifications_read),
        )
        .route(
            "/notifications/{id}/clear-all",
            delete(api::clear_notifications),
        )
        .layer(middleware::from_fn_with_state(
            service_key,
            auth::require_service_key,
        ));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
