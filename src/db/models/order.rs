//! Order Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Order lifecycle: pending -> purchased -> delivered, no backward moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Purchased,
    Delivered,
}

impl OrderStatus {
    /// Whether `next` is a legal forward transition from `self`
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Purchased)
                | (OrderStatus::Purchased, OrderStatus::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Purchased => write!(f, "purchased"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub quantity: i64,
    /// Unit price fetched server-side at creation/update time
    pub price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub vendor: Option<RecordId>,
    pub items: Vec<OrderItem>,
    pub total_payment: Decimal,
    pub status: OrderStatus,
    /// Set once the inventory ledger has been deducted for this order.
    /// Guards against double deduction and feeds the reconcile pass.
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub inventory_applied: bool,
    pub created_at: i64,
}

/// Direct-submission line: the client names product and quantity only,
/// prices are always re-fetched from the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemSubmit {
    /// Product record id, "product:xxx"
    pub product: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderSubmit {
    pub vendor: Option<String>,
    pub items: Vec<OrderItemSubmit>,
}

/// Full update payload; totals are recomputed server-side
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub items: Vec<OrderItemSubmit>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Purchased));
        assert!(OrderStatus::Purchased.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Purchased));
        assert!(!OrderStatus::Purchased.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }
}
