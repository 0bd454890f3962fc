use crate::api::error::AppError;
use crate::api::handlers::MessageResponse;
use crate::entities::{StringList, prelude::*, users};
use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub subscription: Option<users::SubscriptionTier>,
    pub subscribed_categories: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// "active" or "revoked"
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub user: users::Model,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub is_active: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users, passwords excluded", body = Vec<users::Model>),
        (status = 403, description = "Admin only")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<users::Model>>, AppError> {
    let users = Users::find().all(&state.db).await?;
    Ok(Json(users))
}

#[utoipa::path(
    put,
    path = "/admin/user/{id}/subscription",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = users::Model),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn update_subscription(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> Result<Json<users::Model>, AppError> {
    let user = Users::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    if let Some(subscription) = payload.subscription {
        active.subscription = Set(subscription);
    }
    if let Some(subscribed_categories) = payload.subscribed_categories {
        active.subscribed_categories = Set(StringList(subscribed_categories));
    }
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    put,
    path = "/admin/user/{id}/status",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 403, description = "Protected admin account"),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let user = Users::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The seed admin can never lose access, no matter who asks
    if user.email == state.config.admin_email && payload.status == "revoked" {
        return Err(AppError::Forbidden(
            "Cannot revoke the main admin account".to_string(),
        ));
    }

    let revoked = payload.status == "revoked";
    let mut active: users::ActiveModel = user.into();
    match payload.status.as_str() {
        "revoked" => {
            // Revoke access: drop all categories and downgrade the tier
            active.is_active = Set(false);
            active.subscribed_categories = Set(StringList::default());
            active.subscription = Set(users::SubscriptionTier::Free);
        }
        "active" => {
            active.is_active = Set(true);
        }
        other => {
            return Err(AppError::BadRequest(format!("Unknown status '{other}'")));
        }
    }
    let updated = active.update(&state.db).await?;

    let message = if revoked {
        "User access revoked"
    } else {
        "User activated"
    };

    Ok(Json(StatusResponse {
        user: updated,
        message: message.to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/user/{id}/toggle-status",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Status flipped", body = ToggleStatusResponse),
        (status = 403, description = "Protected admin account"),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn toggle_status(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleStatusResponse>, AppError> {
    let user = Users::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.email == state.config.admin_email {
        return Err(AppError::Forbidden(
            "Cannot revoke the main admin account".to_string(),
        ));
    }

    let is_active = !user.is_active;
    let mut active: users::ActiveModel = user.into();
    active.is_active = Set(is_active);
    active.update(&state.db).await?;

    let message = if is_active {
        "User activated"
    } else {
        "User deactivated"
    };

    Ok(Json(ToggleStatusResponse {
        is_active,
        message: message.to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/admin/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Protected admin account"),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = Users::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.email == state.config.admin_email {
        return Err(AppError::Forbidden(
            "Cannot delete the main admin account".to_string(),
        ));
    }

    Users::delete_by_id(&user.id).exec(&state.db).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
