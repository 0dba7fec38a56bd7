//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderItem, OrderStatus};
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Orders belonging to a customer, newest first
    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders routed to a vendor, newest first
    pub async fn find_by_vendor(&self, vendor: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE vendor = $vendor ORDER BY created_at DESC")
            .bind(("vendor", vendor.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Purchased orders whose stock deduction has not been stamped yet.
    /// Fed into the startup reconcile pass.
    pub async fn find_unapplied_purchased(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM orders WHERE status = 'purchased' AND inventory_applied != true ORDER BY created_at",
            )
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Persist a new order with server-computed lines and total
    pub async fn create(
        &self,
        customer: RecordId,
        vendor: Option<RecordId>,
        items: Vec<OrderItem>,
        total_payment: Decimal,
        status: OrderStatus,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE orders SET
                    customer = $customer,
                    vendor = $vendor,
                    items = $items,
                    total_payment = $total_payment,
                    status = $status,
                    inventory_applied = false,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("customer", customer))
            .bind(("vendor", vendor))
            .bind(("items", items))
            .bind(("total_payment", total_payment))
            .bind(("status", status))
            .bind(("created_at", chrono::Utc::now().timestamp()))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Replace the order lines and total
    pub async fn save_items(
        &self,
        id: &str,
        items: Vec<OrderItem>,
        total_payment: Decimal,
    ) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    items = $items,
                    total_payment = $total_payment
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("items", items))
            .bind(("total_payment", total_payment))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Move the order to a new status
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Stamp the order as having had its stock deducted
    pub async fn set_inventory_applied(&self, id: &str) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET inventory_applied = true RETURN AFTER")
            .bind(("thing", thing))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
