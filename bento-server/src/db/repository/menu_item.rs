//! Menu Item Repository

use super::{RepoError, RepoResult, Repository};
use crate::db::Database;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Clone, Debug)]
pub struct MenuItemRepository {
    db: Database,
}

impl MenuItemRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All items of one merchant, ordered by id.
    pub async fn find_by_merchant(&self, merchant_id: i64) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .db
            .menu_items
            .iter()
            .filter(|entry| entry.value().merchant_id == merchant_id)
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }
}

impl Repository<MenuItem, MenuItemCreate, MenuItemUpdate> for MenuItemRepository {
    async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .db
            .menu_items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        Ok(self.db.menu_items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let item = MenuItem {
            id: self.db.next_menu_item_id(),
            merchant_id: data.merchant_id,
            name: data.name,
            description: data.description,
            price: data.price,
            image_url: data.image_url,
        };
        self.db.menu_items.insert(item.id, item.clone());
        Ok(item)
    }

    /// Partial update; absent fields keep their current value. The entry
    /// is mutated in place under its shard lock, so concurrent updates
    /// cannot tear the record.
    async fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let mut entry = self
            .db
            .menu_items
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {}", id)))?;

        if let Some(name) = data.name {
            entry.name = name;
        }
        if let Some(description) = data.description {
            entry.description = description;
        }
        if let Some(price) = data.price {
            entry.price = price;
        }
        if let Some(image_url) = data.image_url {
            entry.image_url = image_url;
        }
        Ok(entry.value().clone())
    }

    /// Remove an item. Returns whether it existed; historical order items
    /// are untouched (their prices were frozen at order time).
    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.menu_items.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rust_decimal::Decimal;

    fn item_create(merchant_id: i64, name: &str, price: &str) -> MenuItemCreate {
        MenuItemCreate {
            merchant_id,
            name: name.to_string(),
            description: "Lunch".to_string(),
            price: price.parse().expect("price"),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_merchant() {
        let repo = MenuItemRepository::new(db::open());

        repo.create(item_create(1, "Bento Box", "10.50")).await.expect("create");
        repo.create(item_create(1, "Miso Soup", "3.00")).await.expect("create");
        repo.create(item_create(2, "Pizza", "8.00")).await.expect("create");

        let items = repo.find_by_merchant(1).await.expect("list");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Bento Box");
        assert_eq!(items[0].price, Decimal::new(1050, 2));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = MenuItemRepository::new(db::open());
        let item = repo.create(item_create(1, "Bento Box", "10.50")).await.expect("create");

        let updated = repo
            .update(
                item.id,
                MenuItemUpdate {
                    price: Some(Decimal::new(1200, 2)),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "Bento Box");
        assert_eq!(updated.price, Decimal::new(1200, 2));
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let repo = MenuItemRepository::new(db::open());
        let err = repo.update(99, MenuItemUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let repo = MenuItemRepository::new(db::open());
        let item = repo.create(item_create(1, "Bento Box", "10.50")).await.expect("create");

        assert!(repo.delete(item.id).await.expect("delete"));
        assert!(!repo.delete(item.id).await.expect("delete again"));
        assert!(repo.find_by_id(item.id).await.expect("find").is_none());
    }
}
