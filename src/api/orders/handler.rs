//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::user::ROLE_CSR;
use crate::db::models::{Order, OrderStatus, OrderSubmit, OrderUpdate};
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

fn is_staff(user: &CurrentUser) -> bool {
    user.has_role(ROLE_CSR)
}

fn owns(user: &CurrentUser, order: &Order) -> bool {
    order.customer.to_string() == user.id
}

/// GET /api/orders - everything for staff, own orders for customers
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = if is_staff(&user) {
        repo.find_all().await?
    } else {
        let customer = parse_record_id(&user.id)?;
        repo.find_by_customer(&customer).await?
    };
    Ok(Json(orders))
}

/// GET /api/orders/vendor/{vendor_id} - staff only
pub async fn list_by_vendor(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    if !is_staff(&user) {
        return Err(AppError::forbidden("CSR role required"));
    }

    let vendor = parse_record_id(&vendor_id)?;
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_vendor(&vendor).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - owner or staff
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if !is_staff(&user) && !owns(&user, &order) {
        return Err(AppError::forbidden("Not your order"));
    }
    Ok(Json(order))
}

/// POST /api/orders - direct submission, created pending
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderSubmit>,
) -> AppResult<Json<Order>> {
    let customer = parse_record_id(&user.id)?;
    let order = state.order_workflow.submit_order(&customer, payload).await?;
    tracing::info!(
        user_id = %user.id,
        order_id = %order.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        total = %order.total_payment,
        "Order submitted"
    );
    Ok(Json(order))
}

/// PUT /api/orders/{id} - staff replace lines / move status;
/// totals are recomputed server-side
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if !is_staff(&user) {
        return Err(AppError::forbidden("CSR role required"));
    }

    let order = state.order_workflow.update_order(&id, payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/purchase - owner or staff; deducts stock
pub async fn purchase(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    if !is_staff(&user) {
        let repo = OrderRepository::new(state.get_db());
        let order = repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
        if !owns(&user, &order) {
            return Err(AppError::forbidden("Not your order"));
        }
    }

    let order = state
        .order_workflow
        .transition(&id, OrderStatus::Purchased)
        .await?;
    tracing::info!(order_id = %id, "Order purchased");
    Ok(Json(order))
}

/// POST /api/orders/{id}/deliver - staff only
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    if !is_staff(&user) {
        return Err(AppError::forbidden("CSR role required"));
    }

    let order = state
        .order_workflow
        .transition(&id, OrderStatus::Delivered)
        .await?;
    tracing::info!(order_id = %id, "Order delivered");
    Ok(Json(order))
}

#[derive(serde::Serialize)]
pub struct ReconcileReport {
    pub applied: usize,
}

/// POST /api/orders/reconcile - admin only; finishes purchased orders
/// whose stock deduction never ran
pub async fn reconcile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ReconcileReport>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }

    let applied = state.order_workflow.reconcile().await?;
    if applied > 0 {
        tracing::warn!(applied, "Reconcile applied pending stock deductions");
    }
    Ok(Json(ReconcileReport { applied }))
}

/// DELETE /api/orders/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }

    let repo = OrderRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(order_id = %id, "Order deleted");
    Ok(Json(true))
}
