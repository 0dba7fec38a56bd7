//! Inventory Model
//!
//! One ledger record per stock-keeping unit. `sku` is the business key the
//! ledger dedups on; `product` is the record link to the catalog document.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type InventoryId = RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<InventoryId>,
    /// Record link to the catalog product
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub sku: String,
    pub product_name: String,
    pub quantity_available: i64,
    pub reorder_level: i64,
    /// Unix timestamp, stamped on every write
    pub last_updated: i64,
}

impl Inventory {
    /// Low-stock condition: strictly below the reorder threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity_available < self.reorder_level
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryCreate {
    /// Product record id, "product:xxx"
    pub product: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub quantity_available: i64,
    #[validate(range(min = 0))]
    pub reorder_level: i64,
}

/// Full-replace update payload
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryUpdate {
    pub quantity_available: i64,
    pub reorder_level: i64,
}
