//! Auth API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Auth router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/merchant/register", post(handler::register_merchant))
        .route("/customer/register", post(handler::register_customer))
        .route("/merchant/login", post(handler::login_merchant))
        .route("/customer/login", post(handler::login_customer))
        .route("/logout", post(handler::logout))
        .route("/user", get(handler::user))
}
