//! Inventory Repository
//!
//! The ledger holds the single authoritative stock counter per SKU.
//! Deduction is two-phase: verify every line, then apply all updates.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Inventory, InventoryCreate, InventoryUpdate, Product};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
}

impl InventoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all inventory records ordered by SKU
    pub async fn find_all(&self) -> RepoResult<Vec<Inventory>> {
        let records: Vec<Inventory> = self
            .base
            .db()
            .query("SELECT * FROM inventory ORDER BY sku")
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Find inventory record by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Inventory>> {
        let thing = parse_record_id(id)?;
        let record: Option<Inventory> = self.base.db().select(thing).await?;
        Ok(record)
    }

    /// Find inventory record by SKU
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Inventory>> {
        let sku_owned = sku.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku_owned))
            .await?;
        let records: Vec<Inventory> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Find inventory record by catalog product link
    pub async fn find_by_product(&self, product: &RecordId) -> RepoResult<Option<Inventory>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory WHERE product = $product LIMIT 1")
            .bind(("product", product.clone()))
            .await?;
        let records: Vec<Inventory> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Records below their reorder threshold
    pub async fn find_low_stock(&self) -> RepoResult<Vec<Inventory>> {
        let records: Vec<Inventory> = self
            .base
            .db()
            .query("SELECT * FROM inventory WHERE quantity_available < reorder_level ORDER BY sku")
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Create a ledger record; SKU is the dedup key and the product link
    /// must resolve to an existing catalog document
    pub async fn create(&self, data: InventoryCreate) -> RepoResult<Inventory> {
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "SKU '{}' already tracked",
                data.sku
            )));
        }

        let product_thing = parse_record_id(&data.product)?;
        let product: Option<Product> = self.base.db().select(product_thing.clone()).await?;
        let product = product
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", data.product)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE inventory SET
                    product = $product,
                    sku = $sku,
                    product_name = $product_name,
                    quantity_available = $quantity_available,
                    reorder_level = $reorder_level,
                    last_updated = $last_updated
                RETURN AFTER"#,
            )
            .bind(("product", product_thing))
            .bind(("sku", data.sku))
            .bind(("product_name", product.name))
            .bind(("quantity_available", data.quantity_available))
            .bind(("reorder_level", data.reorder_level))
            .bind(("last_updated", chrono::Utc::now().timestamp()))
            .await?;

        let created: Option<Inventory> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create inventory record".to_string()))
    }

    /// Replace quantity and threshold, stamping the update time
    pub async fn update(&self, id: &str, data: InventoryUpdate) -> RepoResult<Inventory> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    quantity_available = $quantity_available,
                    reorder_level = $reorder_level,
                    last_updated = $last_updated
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("quantity_available", data.quantity_available))
            .bind(("reorder_level", data.reorder_level))
            .bind(("last_updated", chrono::Utc::now().timestamp()))
            .await?;

        result
            .take::<Option<Inventory>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory {} not found", id)))
    }

    /// Deduct stock for a set of (product, quantity) lines.
    ///
    /// Every line is verified against its ledger record before anything is
    /// written; one short line fails the whole batch. Returns the records
    /// after deduction so callers can inspect low-stock state.
    pub async fn deduct_for_items(
        &self,
        lines: &[(RecordId, i64)],
    ) -> RepoResult<Vec<Inventory>> {
        let mut planned: Vec<(Inventory, i64)> = Vec::with_capacity(lines.len());
        for (product, quantity) in lines {
            let record = self.find_by_product(product).await?.ok_or_else(|| {
                RepoError::BusinessRule(format!("No inventory tracked for {}", product))
            })?;
            if record.quantity_available < *quantity {
                return Err(RepoError::BusinessRule(format!(
                    "Insufficient stock for '{}': {} available, {} requested",
                    record.product_name, record.quantity_available, quantity
                )));
            }
            planned.push((record, *quantity));
        }

        let mut updated = Vec::with_capacity(planned.len());
        for (record, quantity) in planned {
            let thing = record
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Inventory record without id".to_string()))?;
            let mut result = self
                .base
                .db()
                .query(
                    r#"UPDATE $thing SET
                        quantity_available = quantity_available - $quantity,
                        last_updated = $last_updated
                    RETURN AFTER"#,
                )
                .bind(("thing", thing))
                .bind(("quantity", quantity))
                .bind(("last_updated", chrono::Utc::now().timestamp()))
                .await?;
            let record: Option<Inventory> = result.take(0)?;
            updated.push(record.ok_or_else(|| {
                RepoError::Database("Inventory record vanished during deduction".to_string())
            })?);
        }
        Ok(updated)
    }

    /// Hard delete a ledger record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
