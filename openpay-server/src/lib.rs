//! HTTP facade over the OpenPay alias directory and wallet resolver.
//!
//! [`build_router`] assembles every route on top of an [`AppState`]; the
//! `openpay-server` binary binds it to a socket.

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router with CORS and request tracing applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/user/{alias}", get(handlers::get_user))
        .route("/api/send", post(handlers::send))
        .route("/api/resolve-user", post(handlers::resolve_user))
        .route("/api/wallets-db", get(handlers::list_wallets))
        .route("/api/wallets-db/add", post(handlers::add_wallet))
        .route("/api/wallets-db/update", put(handlers::update_wallet))
        .route("/api/wallets-db/delete/{alias}", delete(handlers::delete_wallet))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
