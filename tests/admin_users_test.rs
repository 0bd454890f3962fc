use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_stream_backend::config::AppConfig;
use rust_stream_backend::entities::{StringList, prelude::*, users};
use rust_stream_backend::infrastructure::database;
use rust_stream_backend::services::ingest::IngestService;
use rust_stream_backend::services::mailer::NoopMailer;
use rust_stream_backend::utils::auth::create_jwt;
use rust_stream_backend::{AppState, create_app};
use sea_orm::{ActiveModelTrait, Database, EntityTrait, Set};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();

    AppState {
        db: db.clone(),
        mailer: Arc::new(NoopMailer),
        ingest: Arc::new(IngestService::new(db)),
        config: AppConfig::development(),
    }
}

async fn insert_user(
    state: &AppState,
    email: &str,
    role: users::UserRole,
    categories: &[&str],
) -> (users::Model, String) {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set("Someone".to_string()),
        email: Set(email.to_string()),
        phone: Set(String::new()),
        password_hash: Set("unused".to_string()),
        role: Set(role),
        subscription: Set(users::SubscriptionTier::Premium),
        subscribed_categories: Set(StringList(
            categories.iter().map(|c| c.to_string()).collect(),
        )),
        is_active: Set(true),
        reset_password_token: Set(None),
        reset_password_expires: Set(None),
        created_at: Set(Utc::now()),
    };
    let user = user.insert(&state.db).await.unwrap();
    let token = create_jwt(&user.id, &state.config.jwt_secret).unwrap();
    (user, token)
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn authed_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn protected_admin_survives_every_revocation_path() {
    let state = setup_state().await;
    let protected_email = state.config.admin_email.clone();

    let (protected, _) =
        insert_user(&state, &protected_email, users::UserRole::Admin, &["Action"]).await;
    // Even another admin cannot touch the protected identity
    let (_, other_admin_token) =
        insert_user(&state, "second-admin@example.com", users::UserRole::Admin, &[]).await;

    let app = create_app(state.clone());

    let response = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/admin/user/{}", protected.id),
            &other_admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_json(
            "PUT",
            &format!("/admin/user/{}/status", protected.id),
            &other_admin_token,
            serde_json::json!({"status": "revoked"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(authed(
            "PUT",
            &format!("/admin/user/{}/toggle-status", protected.id),
            &other_admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Still present and active
    let survivor = Users::find_by_id(&protected.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(survivor.is_active);
}

#[tokio::test]
async fn revoking_a_user_clears_categories_and_downgrades_tier() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (user, _) = insert_user(
        &state,
        "member@example.com",
        users::UserRole::User,
        &["Thriller", "Sci-Fi"],
    )
    .await;

    let app = create_app(state.clone());
    let response = app
        .clone()
        .oneshot(authed_json(
            "PUT",
            &format!("/admin/user/{}/status", user.id),
            &admin_token,
            serde_json::json!({"status": "revoked"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "User access revoked");
    assert_eq!(json["user"]["is_active"], false);
    assert_eq!(json["user"]["subscription"], "free");
    assert_eq!(json["user"]["subscribed_categories"], serde_json::json!([]));

    // Re-activating restores the session gate but not the categories
    let response = app
        .oneshot(authed_json(
            "PUT",
            &format!("/admin/user/{}/status", user.id),
            &admin_token,
            serde_json::json!({"status": "active"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reloaded = Users::find_by_id(&user.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.is_active);
    assert!(reloaded.subscribed_categories.0.is_empty());
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (user, _) = insert_user(&state, "member@example.com", users::UserRole::User, &[]).await;

    let app = create_app(state);
    let response = app
        .oneshot(authed_json(
            "PUT",
            &format!("/admin/user/{}/status", user.id),
            &admin_token,
            serde_json::json!({"status": "suspended"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_status_flips_the_active_flag() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (user, _) = insert_user(&state, "member@example.com", users::UserRole::User, &[]).await;

    let app = create_app(state.clone());
    let uri = format!("/admin/user/{}/toggle-status", user.id);

    let response = app
        .clone()
        .oneshot(authed("PUT", &uri, &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["is_active"], false);
    assert_eq!(json["message"], "User deactivated");

    let response = app
        .oneshot(authed("PUT", &uri, &admin_token))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["is_active"], true);
    assert_eq!(json["message"], "User activated");
}

#[tokio::test]
async fn subscription_update_sets_tier_and_categories() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (user, _) = insert_user(&state, "member@example.com", users::UserRole::User, &[]).await;

    let app = create_app(state.clone());
    let response = app
        .oneshot(authed_json(
            "PUT",
            &format!("/admin/user/{}/subscription", user.id),
            &admin_token,
            serde_json::json!({
                "subscription": "premium",
                "subscribed_categories": ["Thriller", "Crime"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["subscription"], "premium");
    assert_eq!(
        json["subscribed_categories"],
        serde_json::json!(["Thriller", "Crime"])
    );
}

#[tokio::test]
async fn user_listing_is_admin_only_and_password_free() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (_, member_token) =
        insert_user(&state, "member@example.com", users::UserRole::User, &[]).await;

    let app = create_app(state);

    let response = app
        .clone()
        .oneshot(authed("GET", "/admin/users", &member_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(authed("GET", "/admin/users", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let listing = json.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    for user in listing {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("reset_password_token").is_none());
    }
}

#[tokio::test]
async fn deleting_a_regular_user_works_and_is_idempotent_about_absence() {
    let state = setup_state().await;
    let (_, admin_token) =
        insert_user(&state, "admin@example.com", users::UserRole::Admin, &[]).await;
    let (user, _) = insert_user(&state, "member@example.com", users::UserRole::User, &[]).await;

    let app = create_app(state.clone());
    let response = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/admin/user/{}", user.id),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        Users::find_by_id(&user.id)
            .one(&state.db)
            .await
            .unwrap()
            .is_none()
    );

    // A second delete reports the absence
    let response = app
        .oneshot(authed(
            "DELETE",
            &format!("/admin/user/{}", user.id),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
