//! Authentication Handlers
//!
//! Registration, login and self-service account management.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::user::{STATUS_ACTIVE, STATUS_DEACTIVATED};
use crate::db::models::{User, UserRegister, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub status: String,
    pub created_at: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            roles: user.roles,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

/// POST /api/auth/register - create an account with the customer role
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> AppResult<Json<UserInfo>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;

    tracing::info!(username = %user.username, "User registered");
    Ok(Json(UserInfo::from(user)))
}

/// POST /api/auth/login - authenticate and issue a JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // One message for both missing user and bad password,
    // so usernames cannot be enumerated
    let user = match user {
        Some(u) => {
            if !u.is_active() {
                return Err(AppError::forbidden("Account has been deactivated"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, &user.roles)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(user),
    }))
}

/// GET /api/auth/me - fresh account data for the caller
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let account = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", user.id)))?;
    Ok(Json(UserInfo::from(account)))
}

/// PUT /api/auth/me - update own email and/or password
pub async fn update_me(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let account = repo.update(&user.id, payload).await?;
    Ok(Json(UserInfo::from(account)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PUT /api/auth/me/status - deactivate or reactivate own account
pub async fn set_my_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<UserInfo>> {
    if payload.status != STATUS_ACTIVE && payload.status != STATUS_DEACTIVATED {
        return Err(AppError::validation(format!(
            "Unknown status '{}'",
            payload.status
        )));
    }

    let repo = UserRepository::new(state.get_db());
    let account = repo.set_status(&user.id, &payload.status).await?;
    tracing::info!(user_id = %user.id, status = %payload.status, "Account status self-service change");
    Ok(Json(UserInfo::from(account)))
}

/// POST /api/auth/logout
pub async fn logout(user: CurrentUser) -> AppResult<Json<()>> {
    tracing::info!(user_id = %user.id, username = %user.username, "User logged out");
    Ok(Json(()))
}
