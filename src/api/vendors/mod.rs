//! Vendor API module
//!
//! Vendor profiles, customer feedback, and the admin comment lock.

pub mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendors", vendor_routes())
}

fn vendor_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/feedback/mine", get(handler::my_feedback))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/feedback", post(handler::add_feedback))
        .route("/{id}/comments/{comment_id}", put(handler::edit_comment))
        .route(
            "/{id}/comments/{comment_id}/editable",
            put(handler::set_comment_editable),
        )
}
