//! Persistence layer
//!
//! An in-memory store behind the repository layer in [`repository`]. The
//! store is deliberately narrow: services depend on repositories, never on
//! the tables directly, so the backing store can be swapped without
//! touching business logic.
//!
//! Locking:
//! - identity tables sit behind one `RwLock` each so the
//!   username-uniqueness check and the insert are a single atomic step;
//! - orders and their items share one `RwLock`'d table so order creation
//!   is all-or-nothing and a concurrent reader never observes an order
//!   without its items;
//! - menu items have no multi-row invariant and live in a `DashMap`.
//!
//! Ids come from per-entity sequences; no id is ever compared across
//! entity kinds.

pub mod repository;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;

use shared::models::{Customer, MenuItem, Merchant, Order, OrderItem};

/// Orders and their line items, guarded together.
#[derive(Debug, Default)]
pub(crate) struct OrderTable {
    pub orders: HashMap<i64, Order>,
    pub items: HashMap<i64, OrderItem>,
}

#[derive(Debug, Default)]
struct Sequences {
    merchants: AtomicI64,
    customers: AtomicI64,
    menu_items: AtomicI64,
    orders: AtomicI64,
    order_items: AtomicI64,
}

/// The in-memory store.
#[derive(Debug, Default)]
pub struct MemDb {
    pub(crate) merchants: RwLock<HashMap<i64, Merchant>>,
    pub(crate) customers: RwLock<HashMap<i64, Customer>>,
    pub(crate) menu_items: DashMap<i64, MenuItem>,
    pub(crate) orders: RwLock<OrderTable>,
    seqs: Sequences,
}

/// Shared handle to the store.
pub type Database = Arc<MemDb>;

/// Open a fresh, empty store.
pub fn open() -> Database {
    Arc::new(MemDb::default())
}

impl MemDb {
    pub(crate) fn next_merchant_id(&self) -> i64 {
        self.seqs.merchants.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn next_customer_id(&self) -> i64 {
        self.seqs.customers.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn next_menu_item_id(&self) -> i64 {
        self.seqs.menu_items.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn next_order_id(&self) -> i64 {
        self.seqs.orders.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn next_order_item_id(&self) -> i64 {
        self.seqs.order_items.fetch_add(1, Ordering::Relaxed) + 1
    }
}
