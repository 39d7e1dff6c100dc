//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry owned by exactly one merchant.
///
/// `image_url` is an opaque reference produced by the upload side-channel
/// and may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub merchant_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

/// Create menu item payload
///
/// The owning merchant is always taken from the authenticated session,
/// never from client input.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub merchant_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}
