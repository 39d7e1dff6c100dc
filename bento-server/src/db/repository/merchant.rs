//! Merchant Repository

use super::{RepoError, RepoResult};
use crate::db::Database;
use shared::models::{Merchant, MerchantCreate};

#[derive(Clone, Debug)]
pub struct MerchantRepository {
    db: Database,
}

impl MerchantRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All merchants, ordered by id.
    pub async fn find_all(&self) -> RepoResult<Vec<Merchant>> {
        let mut merchants: Vec<Merchant> = self.db.merchants.read().values().cloned().collect();
        merchants.sort_by_key(|m| m.id);
        Ok(merchants)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Merchant>> {
        Ok(self.db.merchants.read().get(&id).cloned())
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Merchant>> {
        Ok(self
            .db
            .merchants
            .read()
            .values()
            .find(|m| m.username == username)
            .cloned())
    }

    /// Create a merchant. The uniqueness check and the insert happen under
    /// one write lock so concurrent registrations cannot both succeed.
    pub async fn create(&self, data: MerchantCreate) -> RepoResult<Merchant> {
        let mut merchants = self.db.merchants.write();
        if merchants.values().any(|m| m.username == data.username) {
            return Err(RepoError::Duplicate(format!(
                "Merchant username {}",
                data.username
            )));
        }

        let merchant = Merchant {
            id: self.db.next_merchant_id(),
            username: data.username,
            password_hash: data.password_hash,
            company_name: data.company_name,
            address: data.address,
            description: data.description,
            phone: data.phone,
        };
        merchants.insert(merchant.id, merchant.clone());
        Ok(merchant)
    }
}
