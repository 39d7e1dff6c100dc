//! Repository Module
//!
//! CRUD operations over the store, one repository per entity. Handlers
//! and services construct repositories from the shared [`Database`]
//! handle; nothing outside this module touches the tables.

// Identity
pub mod customer;
pub mod merchant;

// Catalog
pub mod menu_item;

// Orders
pub mod order;

// Re-exports
pub use customer::CustomerRepository;
pub use menu_item::MenuItemRepository;
pub use merchant::MerchantRepository;
pub use order::OrderRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: i64, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
