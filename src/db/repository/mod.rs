//! Repository Module
//!
//! Per-table CRUD on top of a shared database handle. Every update is a
//! full-document replace keyed by id (last writer wins).

pub mod cart;
pub mod category;
pub mod inventory;
pub mod order;
pub mod product;
pub mod user;
pub mod vendor;

pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use inventory::InventoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
pub use vendor::VendorRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a "table:id" string into a RecordId
pub(crate) fn parse_record_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
