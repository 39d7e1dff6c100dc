//! Merchant Directory API Module
//!
//! Public reads: browsing merchants and their menus requires no session.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Merchant router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/merchants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/menu", get(handler::menu))
}
