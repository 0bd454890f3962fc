use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{prelude::Users, users};
use crate::utils::auth::validate_jwt;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sea_orm::EntityTrait;
use serde::Deserialize;

#[derive(Deserialize)]
struct AuthQuery {
    token: Option<String>,
}

/// The account resolved for the current request. The password hash is
/// excluded from every serialization of the inner model.
#[derive(Clone)]
pub struct CurrentUser(pub users::Model);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let token = if let Some(t) = auth_header {
        Some(t)
    } else {
        // Try query parameter
        let query = req.uri().query().unwrap_or_default();
        serde_urlencoded::from_str::<AuthQuery>(query)
            .ok()
            .and_then(|q| q.token)
    };

    let Some(token) = token else {
        return Err(AppError::Unauthorized("Not authorized".to_string()));
    };

    let claims = validate_jwt(&token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Token invalid".to_string()))?;

    let user = Users::find_by_id(claims.sub.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Token invalid".to_string()))?;

    // A valid token on a deactivated account is Forbidden, not Unauthorized
    if !user.is_active {
        return Err(AppError::Forbidden(
            "Account deactivated. Contact admin.".to_string(),
        ));
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = req
        .extensions()
        .get::<CurrentUser>()
        .map(|CurrentUser(user)| user.role == users::UserRole::Admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(AppError::Forbidden("Admin only".to_string()));
    }

    Ok(next.run(req).await)
}
