//! Order Repository
//!
//! Orders and their items share one lock: creation inserts the order and
//! every item before releasing it, so no reader can observe an order
//! without its lines, and status updates serialize against each other.

use chrono::Utc;

use super::{RepoError, RepoResult};
use crate::db::Database;
use shared::models::{Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus};

#[derive(Clone, Debug)]
pub struct OrderRepository {
    db: Database,
}

impl OrderRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create an order with its items as one atomic write.
    ///
    /// The order date is assigned here, never taken from the caller, and
    /// the initial status is always `pending`.
    pub async fn create_with_items(
        &self,
        order: OrderCreate,
        items: Vec<OrderItemCreate>,
    ) -> RepoResult<Order> {
        let mut table = self.db.orders.write();

        let order = Order {
            id: self.db.next_order_id(),
            customer_id: order.customer_id,
            merchant_id: order.merchant_id,
            order_date: Utc::now(),
            delivery_date: order.delivery_date,
            status: OrderStatus::Pending,
            total_amount: order.total_amount,
        };

        for item in items {
            let item = OrderItem {
                id: self.db.next_order_item_id(),
                order_id: order.id,
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
            };
            table.items.insert(item.id, item);
        }
        table.orders.insert(order.id, order.clone());

        Ok(order)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.db.orders.read().orders.get(&id).cloned())
    }

    /// The line items of one order, ordered by id.
    pub async fn items_for(&self, order_id: i64) -> RepoResult<Vec<OrderItem>> {
        let mut items: Vec<OrderItem> = self
            .db
            .orders
            .read()
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    pub async fn find_by_merchant(&self, merchant_id: i64) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .db
            .orders
            .read()
            .orders
            .values()
            .filter(|o| o.merchant_id == merchant_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    pub async fn find_by_customer(&self, customer_id: i64) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .db
            .orders
            .read()
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    /// Transition an order's status in place.
    ///
    /// The legality check runs under the write lock, so two concurrent
    /// updates serialize and the loser is judged against the winner's
    /// committed state. Status is the only field that changes.
    pub async fn update_status(&self, id: i64, next: OrderStatus) -> RepoResult<Order> {
        let mut table = self.db.orders.write();
        let order = table
            .orders
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))?;

        if !order.status.can_transition_to(next) {
            return Err(RepoError::InvalidTransition(format!(
                "{} -> {}",
                order.status, next
            )));
        }

        order.status = next;
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn order_create(customer_id: i64, merchant_id: i64) -> OrderCreate {
        OrderCreate {
            customer_id,
            merchant_id,
            delivery_date: Utc::now() + Duration::days(1),
            total_amount: Decimal::new(2500, 2),
        }
    }

    fn line(menu_item_id: i64, quantity: i64, price: &str) -> OrderItemCreate {
        OrderItemCreate {
            menu_item_id,
            quantity,
            price: price.parse().expect("price"),
        }
    }

    #[tokio::test]
    async fn test_create_with_items_is_complete() {
        let repo = OrderRepository::new(db::open());

        let order = repo
            .create_with_items(
                order_create(1, 2),
                vec![line(10, 2, "10.00"), line(11, 1, "5.00")],
            )
            .await
            .expect("create");

        assert_eq!(order.status, OrderStatus::Pending);
        let items = repo.items_for(order.id).await.expect("items");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id == order.id));
    }

    #[tokio::test]
    async fn test_listing_is_scoped_per_side() {
        let repo = OrderRepository::new(db::open());
        repo.create_with_items(order_create(1, 2), vec![line(10, 1, "4.00")])
            .await
            .expect("create");
        repo.create_with_items(order_create(3, 2), vec![line(10, 1, "4.00")])
            .await
            .expect("create");

        assert_eq!(repo.find_by_merchant(2).await.expect("merchant").len(), 2);
        assert_eq!(repo.find_by_customer(1).await.expect("customer").len(), 1);
        assert_eq!(repo.find_by_customer(5).await.expect("stranger").len(), 0);
    }

    #[tokio::test]
    async fn test_update_status_enforces_transitions() {
        let repo = OrderRepository::new(db::open());
        let order = repo
            .create_with_items(order_create(1, 2), vec![line(10, 1, "4.00")])
            .await
            .expect("create");

        // pending -> delivered skips confirmed
        let err = repo
            .update_status(order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidTransition(_)));

        let confirmed = repo
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .expect("confirm");
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let delivered = repo
            .update_status(order.id, OrderStatus::Delivered)
            .await
            .expect("deliver");
        assert_eq!(delivered.status, OrderStatus::Delivered);

        // delivered is absorbing
        assert!(
            repo.update_status(order.id, OrderStatus::Cancelled)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_status_missing_order() {
        let repo = OrderRepository::new(db::open());
        let err = repo
            .update_status(404, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
