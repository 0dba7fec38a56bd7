//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/products - the full catalog for admins, the visible one for everyone else
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = if user.is_admin() {
        repo.find_all().await?
    } else {
        repo.find_visible().await?
    };
    Ok(Json(products))
}

/// GET /api/products/search?q=term - case-insensitive name search
pub async fn search(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.search_by_name(&query.q, !user.is_admin()).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - hidden products 404 for non-admins
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = if user.is_admin() {
        repo.find_by_id(&id).await?
    } else {
        repo.find_visible_by_id(&id).await?
    };
    product
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
}

/// POST /api/products - admin only
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;
    tracing::info!(name = %product.name, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id} - admin only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    require_admin(&user)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    require_admin(&user)?;

    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(true))
}
