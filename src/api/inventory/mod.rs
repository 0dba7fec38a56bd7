//! Inventory API module
//!
//! Ledger management for CSR staff; admins pass the role check too.

pub mod handler;

use axum::{
    Router, middleware,
    routing::get,
};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::user::ROLE_CSR;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", inventory_routes())
}

fn inventory_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/low-stock", get(handler::list_low_stock))
        .route("/sku/{sku}", get(handler::get_by_sku))
        .route("/product/{product_id}", get(handler::get_by_product))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_role(ROLE_CSR)))
}
