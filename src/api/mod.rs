//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - registration, login, self-service account
//! - [`users`] - admin account management
//! - [`categories`] - catalog categories
//! - [`products`] - catalog products
//! - [`inventory`] - stock ledger (CSR)
//! - [`carts`] - per-customer cart and checkout
//! - [`orders`] - order lifecycle
//! - [`vendors`] - vendor profiles and feedback

pub mod auth;
pub mod carts;
pub mod categories;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod users;
pub mod vendors;

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(inventory::router())
        .merge(carts::router())
        .merge(orders::router())
        .merge(vendors::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .with_state(state)
}
