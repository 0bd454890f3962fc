use crate::api::error::AppError;
use crate::api::middleware::auth::CurrentUser;
use crate::entities::{movies, prelude::*};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct MovieListQuery {
    /// Substring match on the title
    pub q: Option<String>,
    /// Exact category-name membership
    pub category: Option<String>,
    /// "true" restricts to featured movies
    pub featured: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AccessResponse {
    pub has_access: bool,
    pub reason: String,
}

#[utoipa::path(
    get,
    path = "/movies",
    params(MovieListQuery),
    responses(
        (status = 200, description = "Catalog listing, newest first", body = Vec<movies::Model>)
    ),
    tag = "movies"
)]
pub async fn list_movies(
    State(state): State<crate::AppState>,
    Query(params): Query<MovieListQuery>,
) -> Result<Json<Vec<movies::Model>>, AppError> {
    let mut query = Movies::find();

    if let Some(q) = &params.q
        && !q.is_empty()
    {
        query = query.filter(movies::Column::Title.contains(q));
    }
    if let Some(featured) = &params.featured {
        query = query.filter(movies::Column::Featured.eq(featured.as_str() == "true"));
    }

    let mut movies = query
        .order_by_desc(movies::Column::CreatedAt)
        .limit(100)
        .all(&state.db)
        .await?;

    // JSON-array membership is not portable SQL across SQLite and Postgres,
    // so the category facet filters the fetched page instead.
    if let Some(category) = &params.category
        && !category.is_empty()
    {
        movies.retain(|m| m.category.0.iter().any(|c| c == category));
    }

    Ok(Json(movies))
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie details", body = movies::Model),
        (status = 404, description = "Movie not found")
    ),
    tag = "movies"
)]
pub async fn get_movie(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<movies::Model>, AppError> {
    let movie = Movies::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    Ok(Json(movie))
}

#[utoipa::path(
    get,
    path = "/movies/{id}/access",
    params(("id" = String, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Whether the caller may watch this movie", body = AccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Movie not found")
    ),
    security(("jwt" = [])),
    tag = "movies"
)]
pub async fn check_access(
    State(state): State<crate::AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AccessResponse>, AppError> {
    let movie = Movies::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    if user.has_access_to_any(&movie.category.0) {
        return Ok(Json(AccessResponse {
            has_access: true,
            reason: "category-subscription".to_string(),
        }));
    }

    Ok(Json(AccessResponse {
        has_access: false,
        reason: "no-category-access".to_string(),
    }))
}
