//! Order workflow
//!
//! Order creation, the pending -> purchased -> delivered lifecycle, and
//! the stock deduction that rides on the purchase step.
//!
//! The `inventory_applied` stamp on the order document rejects a second
//! apply, and the startup reconcile pass finishes any purchase that
//! crashed between the status write and the deduction. A crash after
//! deduction but before the stamp is re-applied on reconcile, so that
//! window is at-least-once.

use rust_decimal::Decimal;
use surrealdb::RecordId;

use crate::db::DbService;
use crate::db::models::{Order, OrderItem, OrderItemSubmit, OrderStatus, OrderSubmit, OrderUpdate};
use crate::db::repository::{
    CartRepository, InventoryRepository, OrderRepository, ProductRepository, RepoError,
    RepoResult, VendorRepository, parse_record_id,
};
use crate::services::NotificationService;

#[derive(Clone)]
pub struct OrderWorkflow {
    orders: OrderRepository,
    carts: CartRepository,
    products: ProductRepository,
    inventory: InventoryRepository,
    vendors: VendorRepository,
    notifier: NotificationService,
}

impl OrderWorkflow {
    pub fn new(db: &DbService, notifier: NotificationService) -> Self {
        Self {
            orders: OrderRepository::new(db.db.clone()),
            carts: CartRepository::new(db.db.clone()),
            products: ProductRepository::new(db.db.clone()),
            inventory: InventoryRepository::new(db.db.clone()),
            vendors: VendorRepository::new(db.db.clone()),
            notifier,
        }
    }

    /// Checkout: turn the customer's cart into a purchased order.
    ///
    /// The order is priced from the cart's snapshotted lines, stock is
    /// deducted immediately, and the cart is emptied on success. A failed
    /// deduction rolls the order back and leaves the cart untouched.
    pub async fn place_order_from_cart(&self, customer: &RecordId) -> RepoResult<Order> {
        let cart = self
            .carts
            .find_by_customer(customer)
            .await?
            .ok_or_else(|| RepoError::NotFound("Cart is empty".to_string()))?;
        if cart.items.is_empty() {
            return Err(RepoError::BusinessRule(
                "Cannot place an order from an empty cart".to_string(),
            ));
        }

        let items: Vec<OrderItem> = cart
            .items
            .iter()
            .map(|line| OrderItem {
                product: line.product.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                price: line.price,
                line_total: line.line_total(),
            })
            .collect();
        let total_payment = cart.total_amount();

        let order = self
            .orders
            .create(
                customer.clone(),
                None,
                items,
                total_payment,
                OrderStatus::Purchased,
            )
            .await?;
        let order_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order without id".to_string()))?
            .to_string();

        if let Err(e) = self.apply_deduction(&order).await {
            // Roll the order back so the shortage is retryable
            if let Err(rollback) = self.orders.delete(&order_id).await {
                tracing::error!(
                    order_id = %order_id,
                    error = %rollback,
                    "Failed to roll back order after deduction failure"
                );
            }
            return Err(e);
        }

        if let Some(cart_id) = cart.id {
            self.carts.clear(&cart_id).await?;
        }

        self.orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| RepoError::Database("Order vanished after placement".to_string()))
    }

    /// Direct submission: create a pending order from named products.
    /// Prices always come from the catalog, never from the client.
    pub async fn submit_order(
        &self,
        customer: &RecordId,
        data: OrderSubmit,
    ) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("Order has no items".to_string()));
        }

        let vendor = match data.vendor.as_deref() {
            Some(vendor_id) => {
                let thing = parse_record_id(vendor_id)?;
                self.vendors
                    .find_by_id(vendor_id)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", vendor_id)))?;
                Some(thing)
            }
            None => None,
        };

        let (items, total_payment) = self.price_items(&data.items).await?;
        self.orders
            .create(
                customer.clone(),
                vendor,
                items,
                total_payment,
                OrderStatus::Pending,
            )
            .await
    }

    /// Replace the lines of a pending order and optionally move its status.
    /// Totals are recomputed server-side; item edits after purchase are refused.
    pub async fn update_order(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let order = if data.items.is_empty() {
            order
        } else {
            if order.status != OrderStatus::Pending {
                return Err(RepoError::BusinessRule(format!(
                    "Cannot edit items of a {} order",
                    order.status
                )));
            }
            let (items, total_payment) = self.price_items(&data.items).await?;
            self.orders.save_items(id, items, total_payment).await?
        };

        if data.status == order.status {
            return Ok(order);
        }
        self.transition(id, data.status).await
    }

    /// Move an order forward in its lifecycle.
    ///
    /// Purchasing deducts stock; any other jump that `can_transition_to`
    /// rejects is a business-rule error.
    pub async fn transition(&self, id: &str, next: OrderStatus) -> RepoResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if !order.status.can_transition_to(next) {
            return Err(RepoError::BusinessRule(format!(
                "Cannot move order from {} to {}",
                order.status, next
            )));
        }

        let order = self.orders.set_status(id, next).await?;
        if next == OrderStatus::Purchased {
            self.apply_deduction(&order).await?;
        }
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Deduct stock for every line of a purchased order, exactly once.
    ///
    /// A second call for the same order is rejected rather than ignored,
    /// so callers notice retry loops instead of silently looping.
    pub async fn apply_deduction(&self, order: &Order) -> RepoResult<()> {
        let order_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order without id".to_string()))?
            .to_string();

        if order.inventory_applied {
            return Err(RepoError::BusinessRule(format!(
                "Stock already deducted for order {}",
                order_id
            )));
        }

        let lines: Vec<(RecordId, i64)> = order
            .items
            .iter()
            .map(|i| (i.product.clone(), i.quantity))
            .collect();

        let updated = self.inventory.deduct_for_items(&lines).await?;
        self.orders.set_inventory_applied(&order_id).await?;

        for record in &updated {
            self.notifier.notify_low_stock(record);
        }
        Ok(())
    }

    /// Startup pass: finish deductions for purchased orders that were
    /// never stamped (crash between purchase and apply).
    pub async fn reconcile(&self) -> RepoResult<usize> {
        let pending = self.orders.find_unapplied_purchased().await?;
        let mut applied = 0;
        for order in &pending {
            match self.apply_deduction(order).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    let id = order.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                    tracing::error!(order_id = %id, error = %e, "Reconcile could not apply deduction");
                }
            }
        }
        if applied > 0 {
            tracing::info!(count = applied, "Reconciled unapplied purchased orders");
        }
        Ok(applied)
    }

    /// Resolve submitted lines against the visible catalog and price them
    async fn price_items(
        &self,
        lines: &[OrderItemSubmit],
    ) -> RepoResult<(Vec<OrderItem>, Decimal)> {
        let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "Quantity must be positive, got {}",
                    line.quantity
                )));
            }
            let product = self
                .products
                .find_visible_by_id(&line.product)
                .await?
                .ok_or_else(|| {
                    RepoError::NotFound(format!("Product {} not available", line.product))
                })?;
            let product_id = product
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Product without id".to_string()))?;

            let line_total = product.price * Decimal::from(line.quantity);
            items.push(OrderItem {
                product: product_id,
                name: product.name,
                quantity: line.quantity,
                price: product.price,
                line_total,
            });
        }
        let total = items.iter().map(|i| i.line_total).sum();
        Ok((items, total))
    }
}
