//! Router assembly: wires handlers to paths and layers on CORS/tracing,
//! the way the teacher's CLI wires subcommands to their handlers in one
//! place (`zb_cli::main`).

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/healthz", get(handlers::healthz))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
