//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - registration, login, logout, current principal
//! - [`merchants`] - public merchant directory and menus
//! - [`menu_items`] - merchant catalog management
//! - [`orders`] - order placement and lifecycle

pub mod auth;
pub mod health;
pub mod menu_items;
pub mod merchants;
pub mod orders;

use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::core::ServerState;

/// Assemble the full application router.
pub fn app(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(merchants::router())
        .merge(menu_items::router())
        .merge(orders::router())
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
