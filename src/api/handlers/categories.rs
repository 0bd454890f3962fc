use crate::api::error::AppError;
use crate::entities::{categories, prelude::*};
use axum::{Json, extract::State};
use sea_orm::{EntityTrait, QueryOrder};

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories, name ascending", body = Vec<categories::Model>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<categories::Model>>, AppError> {
    let categories = Categories::find()
        .order_by_asc(categories::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(categories))
}
