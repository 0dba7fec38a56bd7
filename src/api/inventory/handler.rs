//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Inventory, InventoryCreate, InventoryUpdate};
use crate::db::repository::{InventoryRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// GET /api/inventory - the whole ledger
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Inventory>>> {
    let repo = InventoryRepository::new(state.get_db());
    let records = repo.find_all().await?;
    Ok(Json(records))
}

/// GET /api/inventory/low-stock - records below their reorder threshold
pub async fn list_low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Inventory>>> {
    let repo = InventoryRepository::new(state.get_db());
    let records = repo.find_low_stock().await?;
    Ok(Json(records))
}

/// GET /api/inventory/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Inventory>> {
    let repo = InventoryRepository::new(state.get_db());
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inventory {}", id)))?;
    Ok(Json(record))
}

/// GET /api/inventory/sku/{sku}
pub async fn get_by_sku(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<Json<Inventory>> {
    let repo = InventoryRepository::new(state.get_db());
    let record = repo
        .find_by_sku(&sku)
        .await?
        .ok_or_else(|| AppError::not_found(format!("SKU {}", sku)))?;
    Ok(Json(record))
}

/// GET /api/inventory/product/{product_id}
pub async fn get_by_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Inventory>> {
    let product = parse_record_id(&product_id)?;
    let repo = InventoryRepository::new(state.get_db());
    let record = repo
        .find_by_product(&product)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No inventory for {}", product_id)))?;
    Ok(Json(record))
}

/// POST /api/inventory - start tracking a SKU
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InventoryCreate>,
) -> AppResult<Json<Inventory>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.quantity_available < 0 {
        return Err(AppError::validation("Quantity cannot be negative"));
    }

    let repo = InventoryRepository::new(state.get_db());
    let record = repo.create(payload).await?;
    tracing::info!(sku = %record.sku, "Inventory record created");
    Ok(Json(record))
}

/// PUT /api/inventory/{id} - replace quantity and threshold.
/// A drop below the threshold here fires a low-stock alert too.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InventoryUpdate>,
) -> AppResult<Json<Inventory>> {
    if payload.quantity_available < 0 || payload.reorder_level < 0 {
        return Err(AppError::validation("Quantities cannot be negative"));
    }

    let repo = InventoryRepository::new(state.get_db());
    let record = repo.update(&id, payload).await?;
    state.notifier.notify_low_stock(&record);
    Ok(Json(record))
}

/// DELETE /api/inventory/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = InventoryRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(inventory_id = %id, "Inventory record deleted");
    Ok(Json(true))
}
