//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`products`] - catalog management and search
//! - [`orders`] - order lifecycle (create, pay, deliver, purge)
//! - [`users`] - minimal user administration (dashboard + cascade delete)
//! - [`dashboard`] - administrative aggregate counts

pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build the full application router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(dashboard::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
