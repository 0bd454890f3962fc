use crate::api::error::AppError;
use crate::api::handlers::MessageResponse;
use crate::api::middleware::auth::CurrentUser;
use crate::entities::{StringList, prelude::*, users};
use crate::utils::auth::{create_jwt, generate_reset_token, hash_reset_token};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::Path, extract::State};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: users::Model,
}

#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub user: users::Model,
}

fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .to_string())
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = Users::find()
        .filter(users::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        role: Set(users::UserRole::User),
        subscription: Set(users::SubscriptionTier::Free),
        subscribed_categories: Set(StringList(vec![state.config.default_category.clone()])),
        is_active: Set(true),
        reset_password_token: Set(None),
        reset_password_expires: Set(None),
        created_at: Set(Utc::now()),
    };
    let user = user.insert(&state.db).await?;

    // A broken mailer must never fail the signup itself
    if let Err(e) = state.mailer.send_welcome(&user.email, &user.name).await {
        warn!("Welcome email failed: {}", e);
    }

    let token =
        create_jwt(&user.id, &state.config.jwt_secret).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account deactivated")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = Users::find()
        .filter(users::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(AppError::Forbidden(
            "Account deactivated. Contact admin.".to_string(),
        ));
    }

    let parsed_hash = argon2::PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let token =
        create_jwt(&user.id, &state.config.jwt_secret).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 404, description = "No account with that email")
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(state): State<crate::AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = Users::find()
        .filter(users::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No account with that email exists".to_string()))?;

    let (token, digest) = generate_reset_token();
    let expires = Utc::now() + Duration::minutes(state.config.reset_token_ttl_minutes);

    let mut active: users::ActiveModel = user.clone().into();
    active.reset_password_token = Set(Some(digest));
    active.reset_password_expires = Set(Some(expires));
    active.update(&state.db).await?;

    // Identical response whether the mailer worked or not, so the reply
    // does not reveal mailer state.
    if let Err(e) = state
        .mailer
        .send_password_reset(&user.email, &token, &user.name)
        .await
    {
        warn!("Password reset email failed: {}", e);
    }

    Ok(Json(MessageResponse::new(
        "Password reset link sent to your email",
    )))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    params(("token" = String, Path, description = "Reset token from the email link")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successful", body = MessageResponse),
        (status = 400, description = "Invalid or expired reset token")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(state): State<crate::AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let digest = hash_reset_token(&token);

    // The expiry filter also rejects consumed tokens: resetting clears both
    // columns, so a second use never matches.
    let user = Users::find()
        .filter(users::Column::ResetPasswordToken.eq(&digest))
        .filter(users::Column::ResetPasswordExpires.gt(Utc::now()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    let password_hash = hash_password(&payload.password)?;

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.reset_password_token = Set(None);
    active.reset_password_expires = Set(None);
    active.update(&state.db).await?;

    Ok(Json(MessageResponse::new("Password reset successful")))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account deactivated")
    ),
    security(("jwt" = [])),
    tag = "auth"
)]
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<users::Model> {
    Json(user)
}

#[utoipa::path(
    put,
    path = "/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "auth"
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut active: users::ActiveModel = user.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(phone) = payload.phone {
        // Empty string is allowed; it clears the number
        active.phone = Set(phone);
    }
    let updated = active.update(&state.db).await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}
