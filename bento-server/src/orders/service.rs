//! Order Service
//!
//! All order mutations flow through here. The service computes totals
//! server-side from resolved catalog prices - a client-sent total is not
//! even representable in the request DTO - and freezes the resolved unit
//! price into each order item so later catalog edits never rewrite
//! history.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use shared::client::{OrderDetail, PlaceOrderRequest};
use shared::models::{Order, OrderCreate, OrderItemCreate, OrderStatus, Principal};

use crate::db::Database;
use crate::db::repository::{MenuItemRepository, OrderRepository, Repository};
use crate::utils::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct OrderService {
    menu_items: MenuItemRepository,
    orders: OrderRepository,
    /// Placement idempotency: `"<customer_id>:<key>"` -> order id.
    idempotency: Arc<DashMap<String, i64>>,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        Self {
            menu_items: MenuItemRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            idempotency: Arc::new(DashMap::new()),
        }
    }

    /// Place an order for the authenticated customer.
    ///
    /// Validates the cart and delivery date, resolves every line against
    /// the catalog, computes the total, and writes order + items as one
    /// atomic operation. With an idempotency key, a replay returns the
    /// originally created order instead of duplicating it.
    pub async fn place_order(
        &self,
        customer_id: i64,
        req: PlaceOrderRequest,
        idempotency_key: Option<String>,
    ) -> AppResult<Order> {
        let replay_key = idempotency_key.map(|key| format!("{customer_id}:{key}"));
        if let Some(key) = &replay_key
            && let Some(order_id) = self.idempotency.get(key).map(|e| *e)
            && let Some(order) = self.orders.find_by_id(order_id).await?
        {
            tracing::info!(order_id, customer_id, "Order placement replayed via idempotency key");
            return Ok(order);
        }

        if req.items.is_empty() {
            return Err(AppError::Validation("Cart must not be empty".to_string()));
        }
        if let Some(line) = req.items.iter().find(|l| l.quantity < 1) {
            return Err(AppError::Validation(format!(
                "Quantity for menu item {} must be at least 1",
                line.menu_item_id
            )));
        }
        // The client form constrains the date picker, but only this check
        // counts.
        if req.order.delivery_date.date_naive() < Utc::now().date_naive() {
            return Err(AppError::Validation(
                "Delivery date must not be in the past".to_string(),
            ));
        }

        let merchant_id = req.order.merchant_id;
        let mut total = Decimal::ZERO;
        let mut items = Vec::with_capacity(req.items.len());

        for line in &req.items {
            let item = self
                .menu_items
                .find_by_id(line.menu_item_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Menu item {}", line.menu_item_id)))?;

            if item.merchant_id != merchant_id {
                return Err(AppError::Validation(format!(
                    "Menu item {} does not belong to merchant {}",
                    item.id, merchant_id
                )));
            }

            total += item.price * Decimal::from(line.quantity);
            items.push(OrderItemCreate {
                menu_item_id: item.id,
                quantity: line.quantity,
                // Freeze the unit price as of now
                price: item.price,
            });
        }

        let order = self
            .orders
            .create_with_items(
                OrderCreate {
                    customer_id,
                    merchant_id,
                    delivery_date: req.order.delivery_date,
                    total_amount: total,
                },
                items,
            )
            .await?;

        if let Some(key) = replay_key {
            self.idempotency.insert(key, order.id);
        }

        tracing::info!(
            order_id = order.id,
            customer_id,
            merchant_id,
            total = %order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    /// Orders visible to the caller: a merchant sees orders it fulfils, a
    /// customer sees orders it placed. Neither side sees the other's list.
    pub async fn list_orders(&self, principal: &Principal) -> AppResult<Vec<Order>> {
        let orders = match principal {
            Principal::Merchant(m) => self.orders.find_by_merchant(m.id).await?,
            Principal::Customer(c) => self.orders.find_by_customer(c.id).await?,
        };
        Ok(orders)
    }

    /// One order with its items, readable only by its merchant or its
    /// customer.
    pub async fn get_order(&self, id: i64, principal: &Principal) -> AppResult<OrderDetail> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {}", id)))?;

        let is_owner = match principal {
            Principal::Merchant(m) => order.merchant_id == m.id,
            Principal::Customer(c) => order.customer_id == c.id,
        };
        if !is_owner {
            return Err(AppError::Forbidden("Not your order".to_string()));
        }

        let items = self.orders.items_for(id).await?;
        Ok(OrderDetail { order, items })
    }

    /// Transition an order's status. Only the fulfilling merchant may do
    /// this, and only along the state machine.
    pub async fn update_status(
        &self,
        order_id: i64,
        next: OrderStatus,
        merchant_id: i64,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;

        // Ownership is immutable post-creation, so checking it outside the
        // write lock is safe.
        if order.merchant_id != merchant_id {
            return Err(AppError::Forbidden("Not your order".to_string()));
        }

        let updated = self.orders.update_status(order_id, next).await?;
        tracing::info!(order_id, merchant_id, status = %updated.status, "Order status updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::repository::{CustomerRepository, MerchantRepository};
    use chrono::Duration;
    use shared::client::{CartLine, OrderDraft};
    use shared::models::{
        Customer, CustomerCreate, MenuItem, MenuItemCreate, MenuItemUpdate, Merchant,
        MerchantCreate,
    };

    struct Fixture {
        db: Database,
        service: OrderService,
        merchant: Merchant,
        customer: Customer,
    }

    async fn fixture() -> Fixture {
        let db = db::open();
        let merchant = MerchantRepository::new(db.clone())
            .create(MerchantCreate {
                username: "bella".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Bella Kitchen".to_string(),
                address: "1 Via Roma".to_string(),
                description: "Italian catering".to_string(),
                phone: "555-0100".to_string(),
            })
            .await
            .expect("merchant");
        let customer = CustomerRepository::new(db.clone())
            .create(CustomerCreate {
                username: "acme".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Acme Corp".to_string(),
                address: "2 Main St".to_string(),
                phone: "555-0200".to_string(),
            })
            .await
            .expect("customer");

        Fixture {
            service: OrderService::new(db.clone()),
            db,
            merchant,
            customer,
        }
    }

    async fn add_item(fx: &Fixture, name: &str, price: &str) -> MenuItem {
        MenuItemRepository::new(fx.db.clone())
            .create(MenuItemCreate {
                merchant_id: fx.merchant.id,
                name: name.to_string(),
                description: "Lunch".to_string(),
                price: price.parse().expect("price"),
                image_url: String::new(),
            })
            .await
            .expect("menu item")
    }

    fn request(merchant_id: i64, items: Vec<CartLine>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            order: OrderDraft {
                merchant_id,
                delivery_date: Utc::now() + Duration::days(1),
            },
            items,
        }
    }

    fn cart_line(menu_item_id: i64, quantity: i64) -> CartLine {
        CartLine {
            menu_item_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_order_computes_total_server_side() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;
        let soup = add_item(&fx, "Miso Soup", "5.00").await;

        let order = fx
            .service
            .place_order(
                fx.customer.id,
                request(
                    fx.merchant.id,
                    vec![cart_line(bento.id, 2), cart_line(soup.id, 1)],
                ),
                None,
            )
            .await
            .expect("place");

        assert_eq!(order.total_amount, Decimal::new(2500, 2));
        assert_eq!(order.status, OrderStatus::Pending);

        let detail = fx
            .service
            .get_order(order.id, &Principal::Customer(fx.customer.clone()))
            .await
            .expect("detail");
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[0].price, Decimal::new(1000, 2));
        assert_eq!(detail.items[1].price, Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn test_frozen_prices_survive_catalog_changes() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;

        let order = fx
            .service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(bento.id, 2)]),
                None,
            )
            .await
            .expect("place");

        // Raise the catalog price, then delete the item entirely
        let catalog = MenuItemRepository::new(fx.db.clone());
        catalog
            .update(
                bento.id,
                MenuItemUpdate {
                    price: Some(Decimal::new(9900, 2)),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        catalog.delete(bento.id).await.expect("delete");

        let detail = fx
            .service
            .get_order(order.id, &Principal::Customer(fx.customer.clone()))
            .await
            .expect("detail");
        assert_eq!(detail.order.total_amount, Decimal::new(2000, 2));
        assert_eq!(detail.items[0].price, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let fx = fixture().await;
        let err = fx
            .service
            .place_order(fx.customer.id, request(fx.merchant.id, vec![]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;

        for quantity in [0, -3] {
            let err = fx
                .service
                .place_order(
                    fx.customer.id,
                    request(fx.merchant.id, vec![cart_line(bento.id, quantity)]),
                    None,
                )
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_past_delivery_date_rejected() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;

        let mut req = request(fx.merchant.id, vec![cart_line(bento.id, 1)]);
        req.order.delivery_date = Utc::now() - Duration::days(1);

        let err = fx
            .service
            .place_order(fx.customer.id, req, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_menu_item_rejected() {
        let fx = fixture().await;
        let err = fx
            .service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(999, 1)]),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_menu_item_rejected() {
        let fx = fixture().await;
        let other = MerchantRepository::new(fx.db.clone())
            .create(MerchantCreate {
                username: "rival".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Rival Foods".to_string(),
                address: "3 Side St".to_string(),
                description: String::new(),
                phone: "555-0300".to_string(),
            })
            .await
            .expect("merchant");
        let foreign = MenuItemRepository::new(fx.db.clone())
            .create(MenuItemCreate {
                merchant_id: other.id,
                name: "Pizza".to_string(),
                description: "Lunch".to_string(),
                price: Decimal::new(800, 2),
                image_url: String::new(),
            })
            .await
            .expect("item");

        let err = fx
            .service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(foreign.id, 1)]),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_idempotency_key_replays_order() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;
        let req = request(fx.merchant.id, vec![cart_line(bento.id, 1)]);

        let first = fx
            .service
            .place_order(fx.customer.id, req.clone(), Some("tab-1".to_string()))
            .await
            .expect("place");
        let second = fx
            .service
            .place_order(fx.customer.id, req.clone(), Some("tab-1".to_string()))
            .await
            .expect("replay");
        assert_eq!(first.id, second.id);

        // A different customer with the same key gets a fresh order
        let other = CustomerRepository::new(fx.db.clone())
            .create(CustomerCreate {
                username: "globex".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Globex".to_string(),
                address: "4 Loop Rd".to_string(),
                phone: "555-0400".to_string(),
            })
            .await
            .expect("customer");
        let third = fx
            .service
            .place_order(other.id, req, Some("tab-1".to_string()))
            .await
            .expect("place");
        assert_ne!(first.id, third.id);
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_caller() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;
        fx.service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(bento.id, 1)]),
                None,
            )
            .await
            .expect("place");

        let other = CustomerRepository::new(fx.db.clone())
            .create(CustomerCreate {
                username: "globex".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Globex".to_string(),
                address: "4 Loop Rd".to_string(),
                phone: "555-0400".to_string(),
            })
            .await
            .expect("customer");

        let merchant_view = fx
            .service
            .list_orders(&Principal::Merchant(fx.merchant.clone()))
            .await
            .expect("merchant list");
        assert_eq!(merchant_view.len(), 1);

        let customer_view = fx
            .service
            .list_orders(&Principal::Customer(fx.customer.clone()))
            .await
            .expect("customer list");
        assert_eq!(customer_view.len(), 1);

        let stranger_view = fx
            .service
            .list_orders(&Principal::Customer(other))
            .await
            .expect("stranger list");
        assert!(stranger_view.is_empty());
    }

    #[tokio::test]
    async fn test_order_detail_hidden_from_non_owner() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;
        let order = fx
            .service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(bento.id, 1)]),
                None,
            )
            .await
            .expect("place");

        let other = CustomerRepository::new(fx.db.clone())
            .create(CustomerCreate {
                username: "globex".to_string(),
                password_hash: "hash".to_string(),
                company_name: "Globex".to_string(),
                address: "4 Loop Rd".to_string(),
                phone: "555-0400".to_string(),
            })
            .await
            .expect("customer");

        let err = fx
            .service
            .get_order(order.id, &Principal::Customer(other))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_status_requires_owning_merchant() {
        let fx = fixture().await;
        let bento = add_item(&fx, "Bento Box", "10.00").await;
        let order = fx
            .service
            .place_order(
                fx.customer.id,
                request(fx.merchant.id, vec![cart_line(bento.id, 1)]),
                None,
            )
            .await
            .expect("place");

        let err = fx
            .service
            .update_status(order.id, OrderStatus::Confirmed, fx.merchant.id + 100)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = fx
            .service
            .update_status(999, OrderStatus::Confirmed, fx.merchant.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let confirmed = fx
            .service
            .update_status(order.id, OrderStatus::Confirmed, fx.merchant.id)
            .await
            .expect("confirm");
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let err = fx
            .service
            .update_status(order.id, OrderStatus::Cancelled, fx.merchant.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }
}
