//! User administration API module
//!
//! Account management: listing, role assignment and deletion are admin
//! operations; status flips are open to CSR staff as well.

pub mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{require_admin, require_role};
use crate::core::ServerState;
use crate::db::models::user::ROLE_CSR;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/roles/{role}", post(handler::assign_role))
        .route_layer(middleware::from_fn(require_admin))
        .merge(
            Router::new()
                .route("/{id}/status", put(handler::set_status))
                .route_layer(middleware::from_fn(require_role(ROLE_CSR))),
        )
}
