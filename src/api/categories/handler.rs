//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate, Product};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(())
}

/// GET /api/categories - all categories for admins, active ones for everyone else
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = if user.is_admin() {
        repo.find_all().await?
    } else {
        repo.find_active().await?
    };
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {}", id)))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/products - products filed under a category;
/// non-admins only see visible ones
pub async fn list_products(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = if user.is_admin() {
        repo.find_by_category(&id).await?
    } else {
        repo.find_visible_by_category(&id).await?
    };
    Ok(Json(products))
}

/// POST /api/categories - admin only
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    tracing::info!(name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id} - admin only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    require_admin(&user)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - admin only; refused while products reference it
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    require_admin(&user)?;

    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(true))
}
