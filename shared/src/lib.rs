//! Shared types for the Bento marketplace
//!
//! Domain entities and API request/response types used by both the
//! server and any client. The wire format is camelCase JSON.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Customer, CustomerCreate, MenuItem, MenuItemCreate, MenuItemUpdate, Merchant, MerchantCreate,
    Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus, Principal, PrincipalKind,
};
