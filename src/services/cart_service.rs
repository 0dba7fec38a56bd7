//! Cart service
//!
//! Validates and merges cart lines. Prices and names are snapshotted at
//! add time; totals are always recomputed from the stored lines.

use surrealdb::RecordId;

use crate::db::DbService;
use crate::db::models::{Cart, CartItem, CartItemAdd};
use crate::db::repository::{
    CartRepository, InventoryRepository, ProductRepository, RepoError, RepoResult,
    parse_record_id,
};

#[derive(Clone)]
pub struct CartService {
    carts: CartRepository,
    products: ProductRepository,
    inventory: InventoryRepository,
}

impl CartService {
    pub fn new(db: &DbService) -> Self {
        Self {
            carts: CartRepository::new(db.db.clone()),
            products: ProductRepository::new(db.db.clone()),
            inventory: InventoryRepository::new(db.db.clone()),
        }
    }

    /// The customer's cart, created empty on first access
    pub async fn get_cart(&self, customer: &RecordId) -> RepoResult<Cart> {
        self.carts.get_or_create(customer).await
    }

    /// Add lines to the cart.
    ///
    /// Each line must name a visible product with tracked stock covering
    /// the requested quantity plus whatever is already in the cart. Lines
    /// for a product already present merge by summing quantities.
    pub async fn add_items(
        &self,
        customer: &RecordId,
        lines: Vec<CartItemAdd>,
    ) -> RepoResult<Cart> {
        if lines.is_empty() {
            return Err(RepoError::Validation("No items to add".to_string()));
        }

        let mut cart = self.carts.get_or_create(customer).await?;

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

            let already_in_cart = cart
                .items
                .iter()
                .find(|i| i.product == product_id)
                .map(|i| i.quantity)
                .unwrap_or(0);

            let stock = self.inventory.find_by_product(&product_id).await?;
            let available = stock.map(|s| s.quantity_available).unwrap_or(0);
            if available < already_in_cart + line.quantity {
                return Err(RepoError::BusinessRule(format!(
                    "Insufficient stock for '{}': {} available, {} requested",
                    product.name,
                    available,
                    already_in_cart + line.quantity
                )));
            }

            match cart.items.iter_mut().find(|i| i.product == product_id) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.items.push(CartItem {
                    product: product_id,
                    name: product.name,
                    price: product.price,
                    quantity: line.quantity,
                }),
            }
        }

        let cart_id = cart
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Cart without id".to_string()))?;
        self.carts.save_items(&cart_id, cart.items).await
    }

    /// Remove a product line from the cart entirely
    pub async fn remove_item(&self, customer: &RecordId, product_id: &str) -> RepoResult<Cart> {
        let product = parse_record_id(product_id)?;
        let cart = self.carts.get_or_create(customer).await?;

        let before = cart.items.len();
        let items: Vec<CartItem> = cart
            .items
            .into_iter()
            .filter(|i| i.product != product)
            .collect();
        if items.len() == before {
            return Err(RepoError::NotFound(format!(
                "Product {} not in cart",
                product_id
            )));
        }

        let cart_id = cart
            .id
            .ok_or_else(|| RepoError::Database("Cart without id".to_string()))?;
        self.carts.save_items(&cart_id, items).await
    }

    /// Empty the cart
    pub async fn clear_cart(&self, customer: &RecordId) -> RepoResult<Cart> {
        let cart = self.carts.get_or_create(customer).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| RepoError::Database("Cart without id".to_string()))?;
        self.carts.clear(&cart_id).await
    }
}
