//! Customer Repository

use super::{RepoError, RepoResult};
use crate::db::Database;
use shared::models::{Customer, CustomerCreate};

#[derive(Clone, Debug)]
pub struct CustomerRepository {
    db: Database,
}

impl CustomerRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Customer>> {
        Ok(self.db.customers.read().get(&id).cloned())
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .db
            .customers
            .read()
            .values()
            .find(|c| c.username == username)
            .cloned())
    }

    /// Create a customer; uniqueness check and insert under one write lock.
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let mut customers = self.db.customers.write();
        if customers.values().any(|c| c.username == data.username) {
            return Err(RepoError::Duplicate(format!(
                "Customer username {}",
                data.username
            )));
        }

        let customer = Customer {
            id: self.db.next_customer_id(),
            username: data.username,
            password_hash: data.password_hash,
            company_name: data.company_name,
            address: data.address,
            phone: data.phone,
        };
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }
}
