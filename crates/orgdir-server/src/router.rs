//! Router construction for the directory server.

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let organizations = Router::new()
        .route(
            "/get_by_address",
            get(handlers::organizations::get_by_address),
        )
        .route("/get_by_name", get(handlers::organizations::get_by_name))
        .route("/get_by_id", get(handlers::organizations::get_by_id))
        .route("/all", get(handlers::organizations::all))
        .route(
            "/get_by_activity",
            get(handlers::organizations::get_by_activity),
        )
        .route(
            "/get_by_radius",
            post(handlers::organizations::get_by_radius),
        );

    Router::new()
        .route("/add/add_data/", post(handlers::add::add_data))
        .route("/add/add_data", post(handlers::add::add_data))
        .nest("/organizations", organizations)
        .route("/health", get(handlers::health::health))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
