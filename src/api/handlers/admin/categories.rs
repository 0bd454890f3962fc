use crate::api::error::AppError;
use crate::api::handlers::MessageResponse;
use crate::entities::{categories, prelude::*};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub is_premium: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/admin/category",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = categories::Model),
        (status = 400, description = "Invalid body or duplicate name"),
        (status = 403, description = "Admin only")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<categories::Model>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(payload.name),
        description: Set(payload.description),
        thumbnail: Set(payload.thumbnail),
        is_premium: Set(payload.is_premium),
        created_at: Set(Utc::now()),
    };

    let category = category
        .insert(&state.db)
        .await
        .map_err(|_e| AppError::BadRequest("Category name already exists".to_string()))?;

    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/admin/category/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = categories::Model),
        (status = 404, description = "Category not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<categories::Model>, AppError> {
    let category = Categories::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let mut active: categories::ActiveModel = category.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(thumbnail) = payload.thumbnail {
        active.thumbnail = Set(thumbnail);
    }
    if let Some(is_premium) = payload.is_premium {
        active.is_premium = Set(is_premium);
    }
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/category/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse)
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // No cascade: movies and users may keep referencing the deleted name
    Categories::delete_by_id(&id).exec(&state.db).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
