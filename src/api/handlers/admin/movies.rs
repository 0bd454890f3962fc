use crate::api::error::AppError;
use crate::api::handlers::MessageResponse;
use crate::entities::{StringList, movies, prelude::*};
use crate::services::ingest::IngestReport;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct MovieRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub video_type: movies::VideoType,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub batch_no: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub video_url: Option<String>,
    pub video_type: Option<movies::VideoType>,
    pub category: Option<Vec<String>>,
    pub batch_no: Option<String>,
    pub duration: Option<String>,
    pub featured: Option<bool>,
    pub is_premium: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct BulkMoviesRequest {
    pub movies: Vec<MovieRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct BulkMoviesResponse {
    pub success: bool,
    pub count: usize,
    pub movies: Vec<movies::Model>,
}

const SAMPLE_CSV: &str = "title,description,poster,videoUrl,videoType,category,batchNo,duration,featured,isPremium\n\
Sample Movie 1,This is a great action movie,https://via.placeholder.com/300x450?text=Movie1,https://www.youtube.com/watch?v=dQw4w9WgXcQ,youtube,\"Action,Drama\",BATCH-2024-001,2h 15min,true,true\n\
Sample Movie 2,Comedy film for everyone,https://via.placeholder.com/300x450?text=Movie2,https://example.com/video.mp4,direct,Comedy,BATCH-2024-002,1h 45min,false,false\n\
Sample Movie 3,Thrilling sci-fi adventure,https://via.placeholder.com/300x450?text=Movie3,https://www.youtube.com/watch?v=example,youtube,\"Sci-Fi,Thriller\",BATCH-2024-003,2h 30min,true,true\n";

fn new_movie(req: MovieRequest) -> movies::Model {
    movies::Model {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description,
        poster: req.poster,
        video_url: req.video_url,
        video_type: req.video_type,
        category: StringList(req.category),
        batch_no: req.batch_no,
        duration: req.duration,
        featured: req.featured,
        is_premium: req.is_premium,
        created_at: Utc::now(),
    }
}

fn to_active(model: &movies::Model) -> movies::ActiveModel {
    movies::ActiveModel {
        id: Set(model.id.clone()),
        title: Set(model.title.clone()),
        description: Set(model.description.clone()),
        poster: Set(model.poster.clone()),
        video_url: Set(model.video_url.clone()),
        video_type: Set(model.video_type),
        category: Set(model.category.clone()),
        batch_no: Set(model.batch_no.clone()),
        duration: Set(model.duration.clone()),
        featured: Set(model.featured),
        is_premium: Set(model.is_premium),
        created_at: Set(model.created_at),
    }
}

#[utoipa::path(
    get,
    path = "/admin/movies/sample-csv",
    responses(
        (status = 200, description = "CSV template with example rows", body = String, content_type = "text/csv")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn sample_csv() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample-movies.csv\"",
            ),
        ],
        SAMPLE_CSV,
    )
}

#[utoipa::path(
    post,
    path = "/admin/movies/bulk-csv",
    request_body(content = String, description = "Multipart upload with a single `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Ingestion report, possibly with skipped duplicates", body = IngestReport),
        (status = 400, description = "Missing file, unparsable CSV, no valid rows, or all duplicates"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn bulk_upload_csv(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>, AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
            break;
        }
    }

    let Some(data) = file else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    let report = state.ingest.ingest_csv(&data).await?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/admin/movies/bulk",
    request_body = BulkMoviesRequest,
    responses(
        (status = 200, description = "Movies inserted", body = BulkMoviesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn bulk_movies(
    State(state): State<crate::AppState>,
    Json(req): Json<BulkMoviesRequest>,
) -> Result<Json<BulkMoviesResponse>, AppError> {
    // Kept for backward compatibility with the CSV route; this variant does
    // not reconcile against existing titles.
    if req.movies.is_empty() {
        return Ok(Json(BulkMoviesResponse {
            success: true,
            count: 0,
            movies: Vec::new(),
        }));
    }

    let created: Vec<movies::Model> = req.movies.into_iter().map(new_movie).collect();
    Movies::insert_many(created.iter().map(to_active))
        .exec(&state.db)
        .await?;

    Ok(Json(BulkMoviesResponse {
        success: true,
        count: created.len(),
        movies: created,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/movie",
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Movie created", body = movies::Model),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn create_movie(
    State(state): State<crate::AppState>,
    Json(payload): Json<MovieRequest>,
) -> Result<Json<movies::Model>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let movie = new_movie(payload);
    to_active(&movie).insert(&state.db).await?;

    Ok(Json(movie))
}

#[utoipa::path(
    put,
    path = "/admin/movie/{id}",
    params(("id" = String, Path, description = "Movie id")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = movies::Model),
        (status = 404, description = "Movie not found")
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn update_movie(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<Json<movies::Model>, AppError> {
    let movie = Movies::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut active: movies::ActiveModel = movie.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(poster) = payload.poster {
        active.poster = Set(poster);
    }
    if let Some(video_url) = payload.video_url {
        active.video_url = Set(video_url);
    }
    if let Some(video_type) = payload.video_type {
        active.video_type = Set(video_type);
    }
    if let Some(category) = payload.category {
        active.category = Set(StringList(category));
    }
    if let Some(batch_no) = payload.batch_no {
        active.batch_no = Set(batch_no);
    }
    if let Some(duration) = payload.duration {
        active.duration = Set(duration);
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(is_premium) = payload.is_premium {
        active.is_premium = Set(is_premium);
    }
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/movie/{id}",
    params(("id" = String, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie deleted", body = MessageResponse)
    ),
    security(("jwt" = [])),
    tag = "admin"
)]
pub async fn delete_movie(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Movies::delete_by_id(&id).exec(&state.db).await?;
    Ok(Json(MessageResponse::new("Deleted")))
}
