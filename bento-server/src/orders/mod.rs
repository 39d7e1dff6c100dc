//! Order lifecycle
//!
//! [`OrderService`] owns every order mutation: cart validation, total
//! computation, atomic creation, scoped reads, and the status state
//! machine.

pub mod service;

pub use service::OrderService;
