//! Cart Repository
//!
//! One cart document per customer; lines are embedded and replaced wholesale.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart owned by a customer
    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE customer = $customer LIMIT 1")
            .bind(("customer", customer.clone()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Fetch the customer's cart, creating an empty one on first use
    pub async fn get_or_create(&self, customer: &RecordId) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_customer(customer).await? {
            return Ok(cart);
        }

        let mut result = self
            .base
            .db()
            .query("CREATE cart SET customer = $customer, items = [] RETURN AFTER")
            .bind(("customer", customer.clone()))
            .await?;

        let created: Option<Cart> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Replace the cart lines
    pub async fn save_items(&self, cart_id: &RecordId, items: Vec<CartItem>) -> RepoResult<Cart> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET items = $items RETURN AFTER")
            .bind(("thing", cart_id.clone()))
            .bind(("items", items))
            .await?;

        result
            .take::<Option<Cart>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Cart {} not found", cart_id)))
    }

    /// Empty the cart, keeping the document
    pub async fn clear(&self, cart_id: &RecordId) -> RepoResult<Cart> {
        self.save_items(cart_id, Vec::new()).await
    }
}
