//! Principal Models
//!
//! Merchants and customers are disjoint account spaces with independently
//! assigned ids. A merchant id 3 and a customer id 3 are different
//! principals, so everything that refers to an account carries its
//! [`PrincipalKind`] alongside the id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two account kinds of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Merchant,
    Customer,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Merchant => "merchant",
            PrincipalKind::Customer => "customer",
        }
    }

    /// Parse the lowercase wire name. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "merchant" => Some(PrincipalKind::Merchant),
            "customer" => Some(PrincipalKind::Customer),
            _ => None,
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant account
///
/// The password hash is never serialized to the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub company_name: String,
    pub address: String,
    pub description: String,
    pub phone: String,
}

/// Customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub company_name: String,
    pub address: String,
    pub phone: String,
}

/// Create merchant payload (password already hashed by the caller)
#[derive(Debug, Clone)]
pub struct MerchantCreate {
    pub username: String,
    pub password_hash: String,
    pub company_name: String,
    pub address: String,
    pub description: String,
    pub phone: String,
}

/// Create customer payload (password already hashed by the caller)
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub username: String,
    pub password_hash: String,
    pub company_name: String,
    pub address: String,
    pub phone: String,
}

/// An authenticated account of either kind.
#[derive(Debug, Clone)]
pub enum Principal {
    Merchant(Merchant),
    Customer(Customer),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Principal::Merchant(m) => m.id,
            Principal::Customer(c) => c.id,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Merchant(_) => PrincipalKind::Merchant,
            Principal::Customer(_) => PrincipalKind::Customer,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::Merchant(m) => &m.username,
            Principal::Customer(c) => &c.username,
        }
    }

    pub fn company_name(&self) -> &str {
        match self {
            Principal::Merchant(m) => &m.company_name,
            Principal::Customer(c) => &c.company_name,
        }
    }
}
