//! Cart Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type CartId = RecordId;

/// A single cart line, snapshotting name and price at add time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Per-customer cart; at most one per customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|i| i.line_total()).sum()
    }
}

/// Request line for adding items to a cart
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemAdd {
    /// Product record id, "product:xxx"
    pub product: String,
    pub quantity: i64,
}
