//! Menu Item API Module
//!
//! Mutations require a merchant session; update and delete additionally
//! require the caller to own the item.

mod handler;

use axum::{
    Router,
    routing::{patch, post},
};

use crate::core::ServerState;

/// Menu item router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu-items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", patch(handler::update).delete(handler::delete))
}
