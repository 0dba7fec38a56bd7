//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::user::{ROLE_CUSTOMER, ROLE_VENDOR};
use crate::db::models::{
    Comment, CommentEdit, CustomerFeedback, FeedbackCreate, Vendor, VendorCreate, VendorUpdate,
};
use crate::db::repository::{VendorRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct EditableUpdate {
    pub editable: bool,
}

/// GET /api/vendors
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendor>>> {
    let repo = VendorRepository::new(state.get_db());
    let vendors = repo.find_all().await?;
    Ok(Json(vendors))
}

/// GET /api/vendors/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vendor>> {
    let repo = VendorRepository::new(state.get_db());
    let vendor = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {}", id)))?;
    Ok(Json(vendor))
}

/// POST /api/vendors - create own profile; needs the vendor role
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VendorCreate>,
) -> AppResult<Json<Vendor>> {
    if !user.has_role(ROLE_VENDOR) {
        return Err(AppError::forbidden("Vendor role required"));
    }
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let owner = parse_record_id(&user.id)?;
    let repo = VendorRepository::new(state.get_db());
    let vendor = repo.create(owner, payload).await?;
    tracing::info!(user_id = %user.id, name = %vendor.name, "Vendor profile created");
    Ok(Json(vendor))
}

/// PUT /api/vendors/{id} - owner or admin
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VendorUpdate>,
) -> AppResult<Json<Vendor>> {
    let repo = VendorRepository::new(state.get_db());
    let vendor = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {}", id)))?;

    if !user.is_admin() && vendor.user.to_string() != user.id {
        return Err(AppError::forbidden("Not your vendor profile"));
    }

    let vendor = repo.update(&id, payload).await?;
    Ok(Json(vendor))
}

/// DELETE /api/vendors/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }

    let repo = VendorRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(vendor_id = %id, "Vendor profile deleted");
    Ok(Json(true))
}

/// POST /api/vendors/{id}/feedback - customer leaves a rated comment;
/// the vendor's average rating is recomputed on append
pub async fn add_feedback(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<FeedbackCreate>,
) -> AppResult<Json<Vendor>> {
    if !user.has_role(ROLE_CUSTOMER) {
        return Err(AppError::forbidden("Customer role required"));
    }
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let customer = parse_record_id(&user.id)?;
    let comment = Comment::new(customer, payload.rank, payload.text);

    let repo = VendorRepository::new(state.get_db());
    let vendor = repo.add_feedback(&id, comment).await?;
    tracing::info!(vendor_id = %id, user_id = %user.id, "Feedback added");
    Ok(Json(vendor))
}

/// PUT /api/vendors/{id}/comments/{comment_id} - author edits their text;
/// the rank never changes
pub async fn edit_comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, comment_id)): Path<(String, String)>,
    Json(payload): Json<CommentEdit>,
) -> AppResult<Json<Vendor>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let author = parse_record_id(&user.id)?;
    let repo = VendorRepository::new(state.get_db());
    let vendor = repo
        .edit_comment(&id, &comment_id, &author, payload.text)
        .await?;
    Ok(Json(vendor))
}

/// PUT /api/vendors/{id}/comments/{comment_id}/editable - admin lock/unlock
pub async fn set_comment_editable(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, comment_id)): Path<(String, String)>,
    Json(payload): Json<EditableUpdate>,
) -> AppResult<Json<Vendor>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }

    let repo = VendorRepository::new(state.get_db());
    let vendor = repo
        .set_comment_editable(&id, &comment_id, payload.editable)
        .await?;
    tracing::info!(
        vendor_id = %id,
        comment_id = %comment_id,
        editable = payload.editable,
        "Comment edit lock changed"
    );
    Ok(Json(vendor))
}

/// GET /api/vendors/feedback/mine - everything the caller has written
pub async fn my_feedback(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CustomerFeedback>>> {
    let customer = parse_record_id(&user.id)?;
    let repo = VendorRepository::new(state.get_db());
    let feedback = repo.find_feedback_by_customer(&customer).await?;
    Ok(Json(feedback))
}
