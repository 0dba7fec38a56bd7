//! User administration handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::auth::handler::UserInfo;
use crate::core::ServerState;
use crate::db::models::user::{
    ROLE_ADMIN, ROLE_CSR, ROLE_CUSTOMER, ROLE_VENDOR, STATUS_ACTIVE, STATUS_DEACTIVATED,
};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// GET /api/users - list all accounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    Ok(Json(UserInfo::from(user)))
}

/// PUT /api/users/{id}/status - activate or deactivate an account
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<UserInfo>> {
    if payload.status != STATUS_ACTIVE && payload.status != STATUS_DEACTIVATED {
        return Err(AppError::validation(format!(
            "Unknown status '{}'",
            payload.status
        )));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.set_status(&id, &payload.status).await?;
    tracing::info!(user_id = %id, status = %payload.status, "Account status changed");
    Ok(Json(UserInfo::from(user)))
}

/// POST /api/users/{id}/roles/{role} - grant a role
pub async fn assign_role(
    State(state): State<ServerState>,
    Path((id, role)): Path<(String, String)>,
) -> AppResult<Json<UserInfo>> {
    let known = [ROLE_ADMIN, ROLE_CSR, ROLE_VENDOR, ROLE_CUSTOMER];
    if !known.contains(&role.as_str()) {
        return Err(AppError::validation(format!("Unknown role '{}'", role)));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.assign_role(&id, &role).await?;
    tracing::info!(user_id = %id, role = %role, "Role assigned");
    Ok(Json(UserInfo::from(user)))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = UserRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(user_id = %id, "Account deleted");
    Ok(Json(true))
}
