pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::ingest::IngestService;
use crate::services::mailer::Mailer;
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::auth::forgot_password,
        api::handlers::auth::reset_password,
        api::handlers::auth::get_me,
        api::handlers::auth::update_profile,
        api::handlers::movies::list_movies,
        api::handlers::movies::get_movie,
        api::handlers::movies::check_access,
        api::handlers::categories::list_categories,
        api::handlers::health::health_check,
        api::handlers::admin::movies::sample_csv,
        api::handlers::admin::movies::bulk_upload_csv,
        api::handlers::admin::movies::bulk_movies,
        api::handlers::admin::movies::create_movie,
        api::handlers::admin::movies::update_movie,
        api::handlers::admin::movies::delete_movie,
        api::handlers::admin::categories::create_category,
        api::handlers::admin::categories::update_category,
        api::handlers::admin::categories::delete_category,
        api::handlers::admin::users::list_users,
        api::handlers::admin::users::update_subscription,
        api::handlers::admin::users::update_status,
        api::handlers::admin::users::toggle_status,
        api::handlers::admin::users::delete_user,
    ),
    components(
        schemas(
            api::handlers::MessageResponse,
            api::handlers::auth::SignupRequest,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::AuthResponse,
            api::handlers::auth::ForgotPasswordRequest,
            api::handlers::auth::ResetPasswordRequest,
            api::handlers::auth::UpdateProfileRequest,
            api::handlers::auth::ProfileResponse,
            api::handlers::movies::AccessResponse,
            api::handlers::health::HealthResponse,
            api::handlers::admin::movies::MovieRequest,
            api::handlers::admin::movies::UpdateMovieRequest,
            api::handlers::admin::movies::BulkMoviesRequest,
            api::handlers::admin::movies::BulkMoviesResponse,
            api::handlers::admin::categories::CategoryRequest,
            api::handlers::admin::categories::UpdateCategoryRequest,
            api::handlers::admin::users::UpdateSubscriptionRequest,
            api::handlers::admin::users::UpdateStatusRequest,
            api::handlers::admin::users::StatusResponse,
            api::handlers::admin::users::ToggleStatusResponse,
            services::ingest::IngestReport,
            entities::StringList,
            entities::users::Model,
            entities::users::UserRole,
            entities::users::SubscriptionTier,
            entities::movies::Model,
            entities::movies::VideoType,
            entities::categories::Model,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and account recovery"),
        (name = "movies", description = "Public catalog and access checks"),
        (name = "categories", description = "Catalog facets"),
        (name = "admin", description = "Role-gated catalog and user management"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    pub ingest: Arc<IngestService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/movies/sample-csv",
            get(api::handlers::admin::sample_csv),
        )
        .route(
            "/movies/bulk-csv",
            post(api::handlers::admin::bulk_upload_csv).layer(
                axum::extract::DefaultBodyLimit::max(state.config.max_csv_size),
            ),
        )
        .route("/movies/bulk", post(api::handlers::admin::bulk_movies))
        .route("/movie", post(api::handlers::admin::create_movie))
        .route(
            "/movie/:id",
            put(api::handlers::admin::update_movie).delete(api::handlers::admin::delete_movie),
        )
        .route(
            "/categories",
            get(api::handlers::categories::list_categories),
        )
        .route("/category", post(api::handlers::admin::create_category))
        .route(
            "/category/:id",
            put(api::handlers::admin::update_category)
                .delete(api::handlers::admin::delete_category),
        )
        .route("/users", get(api::handlers::admin::list_users))
        .route(
            "/user/:id/subscription",
            put(api::handlers::admin::update_subscription),
        )
        .route("/user/:id/status", put(api::handlers::admin::update_status))
        .route(
            "/user/:id/toggle-status",
            put(api::handlers::admin::toggle_status),
        )
        .route("/user/:id", delete(api::handlers::admin::delete_user))
        .layer(from_fn(api::middleware::auth::admin_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/auth/signup", post(api::handlers::auth::signup))
        .route("/auth/login", post(api::handlers::auth::login))
        .route(
            "/auth/forgot-password",
            post(api::handlers::auth::forgot_password),
        )
        .route(
            "/auth/reset-password/:token",
            post(api::handlers::auth::reset_password),
        )
        .route(
            "/auth/me",
            get(api::handlers::auth::get_me).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/auth/update-profile",
            put(api::handlers::auth::update_profile).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route("/movies", get(api::handlers::movies::list_movies))
        .route("/movies/:id", get(api::handlers::movies::get_movie))
        .route(
            "/movies/:id/access",
            get(api::handlers::movies::check_access).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/categories",
            get(api::handlers::categories::list_categories),
        )
        .nest("/admin", admin_routes)
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
    }
}
