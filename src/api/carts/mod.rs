//! Cart API module
//!
//! Every route operates on the calling customer's own cart.

pub mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart).delete(handler::clear))
        .route("/items", post(handler::add_items))
        .route("/items/{product_id}", delete(handler::remove_item))
        .route("/checkout", post(handler::checkout))
}
