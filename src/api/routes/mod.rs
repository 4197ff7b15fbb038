//! API routes module - organizes all route handlers.
//!
//! Type definitions live under /types and carts under /carts.

pub mod app_state;
pub mod carts;
pub mod error;
pub mod types;

use crate::middleware::create_custom_cors_layer;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use app_state::AppState;
pub use error::ApiError;

/// Create the main API router combining all route modules
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/types", types::types_router())
        .nest("/carts", carts::carts_router())
    // Note: State is applied by callers who need it (e.g., TestServer)
}

/// Full application: routes, state and middleware layers.
pub fn create_app(app_state: AppState, cors_allowed_origins: &[String]) -> Router {
    create_api_router().with_state(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_custom_cors_layer(cors_allowed_origins)),
    )
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "commerce-console-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
