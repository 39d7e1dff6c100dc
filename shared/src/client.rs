//! Client-related types shared between server and client
//!
//! Request/response types of the JSON API. Bodies are camelCase on the
//! wire; responses never carry password hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Order, OrderItem, Principal, PrincipalKind};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Merchant registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRegisterRequest {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
}

/// Customer registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRegisterRequest {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The session principal as seen by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalInfo {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub username: String,
    pub company_name: String,
}

impl From<&Principal> for PrincipalInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id(),
            kind: principal.kind(),
            username: principal.username().to_string(),
            company_name: principal.company_name().to_string(),
        }
    }
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// The order header a customer submits at placement.
///
/// Status, order date, and total are server-assigned and deliberately not
/// representable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub merchant_id: i64,
    pub delivery_date: DateTime<Utc>,
}

/// One cart line: a menu item reference and a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Order placement request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub order: OrderDraft,
    pub items: Vec<CartLine>,
}

/// Status update request; the status is parsed against the canonical set
/// server-side so unknown values fail as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// An order together with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
