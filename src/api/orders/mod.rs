//! Order API module
//!
//! Customers submit and read their own orders; CSR staff and admins
//! manage the full set and drive the lifecycle.

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/reconcile", post(handler::reconcile))
        .route("/vendor/{vendor_id}", get(handler::list_by_vendor))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/purchase", post(handler::purchase))
        .route("/{id}/deliver", post(handler::deliver))
}
