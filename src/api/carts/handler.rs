//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::user::ROLE_CUSTOMER;
use crate::db::models::{Cart, CartItemAdd, Order};
use crate::db::repository::parse_record_id;
use crate::utils::{AppError, AppResult};

/// Cart plus its derived total, the shape every cart route returns
#[derive(Debug, Serialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub total_amount: rust_decimal::Decimal,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total_amount = cart.total_amount();
        Self { cart, total_amount }
    }
}

fn customer_id(user: &CurrentUser) -> AppResult<RecordId> {
    if !user.has_role(ROLE_CUSTOMER) {
        return Err(AppError::forbidden("Customer role required"));
    }
    Ok(parse_record_id(&user.id)?)
}

/// GET /api/cart - the caller's cart, created empty on first access
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    let customer = customer_id(&user)?;
    let cart = state.cart_service.get_cart(&customer).await?;
    Ok(Json(CartView::from(cart)))
}

/// POST /api/cart/items - add lines, merging duplicates
pub async fn add_items(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(lines): Json<Vec<CartItemAdd>>,
) -> AppResult<Json<CartView>> {
    let customer = customer_id(&user)?;
    let cart = state.cart_service.add_items(&customer, lines).await?;
    Ok(Json(CartView::from(cart)))
}

/// DELETE /api/cart/items/{product_id} - drop one product line
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<CartView>> {
    let customer = customer_id(&user)?;
    let cart = state
        .cart_service
        .remove_item(&customer, &product_id)
        .await?;
    Ok(Json(CartView::from(cart)))
}

/// DELETE /api/cart - empty the cart
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    let customer = customer_id(&user)?;
    let cart = state.cart_service.clear_cart(&customer).await?;
    Ok(Json(CartView::from(cart)))
}

/// POST /api/cart/checkout - turn the cart into a purchased order
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let customer = customer_id(&user)?;
    let order = state
        .order_workflow
        .place_order_from_cart(&customer)
        .await?;
    tracing::info!(
        user_id = %user.id,
        order_id = %order.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        total = %order.total_payment,
        "Order placed from cart"
    );
    Ok(Json(order))
}
