use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_stream_backend::config::AppConfig;
use rust_stream_backend::entities::{StringList, categories, movies, users};
use rust_stream_backend::infrastructure::database;
use rust_stream_backend::services::ingest::IngestService;
use rust_stream_backend::services::mailer::NoopMailer;
use rust_stream_backend::utils::auth::create_jwt;
use rust_stream_backend::{AppState, create_app};
use sea_orm::{ActiveModelTrait, Database, Set};
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
    subscription: users::SubscriptionTier,
    categories: &[&str],
) -> String {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set("Viewer".to_string()),
        email: Set(format!("{}@example.com", Uuid::new_v4())),
        phone: Set(String::new()),
        password_hash: Set("unused".to_string()),
        role: Set(users::UserRole::User),
        subscription: Set(subscription),
        subscribed_categories: Set(StringList(
            categories.iter().map(|c| c.to_string()).collect(),
        )),
        is_active: Set(true),
        reset_password_token: Set(None),
        reset_password_expires: Set(None),
        created_at: Set(Utc::now()),
    };
    let user = user.insert(&state.db).await.unwrap();
    create_jwt(&user.id, &state.config.jwt_secret).unwrap()
}

async fn insert_movie(state: &AppState, title: &str, cats: &[&str], featured: bool) -> String {
    let movie = movies::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(title.to_string()),
        description: Set(String::new()),
        poster: Set(String::new()),
        video_url: Set(String::new()),
        video_type: Set(movies::VideoType::Direct),
        category: Set(StringList(cats.iter().map(|c| c.to_string()).collect())),
        batch_no: Set(String::new()),
        duration: Set(String::new()),
        featured: Set(featured),
        is_premium: Set(false),
        created_at: Set(Utc::now()),
    };
    movie.insert(&state.db).await.unwrap().id
}

async fn access_check(app: &axum::Router, movie_id: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/movies/{}/access", movie_id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn access_requires_overlapping_category_subscription() {
    let state = setup_state().await;
    let movie_id = insert_movie(&state, "Dark", &["Thriller", "Drama"], false).await;
    let app = create_app(state.clone());

    let subscriber = insert_user(&state, users::SubscriptionTier::Free, &["Drama"]).await;
    let (status, json) = access_check(&app, &movie_id, &subscriber).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["has_access"], true);
    assert_eq!(json["reason"], "category-subscription");

    let outsider = insert_user(&state, users::SubscriptionTier::Free, &["Comedy"]).await;
    let (status, json) = access_check(&app, &movie_id, &outsider).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["has_access"], false);
    assert_eq!(json["reason"], "no-category-access");
}

#[tokio::test]
async fn empty_category_sets_never_grant_access() {
    let state = setup_state().await;
    let app = create_app(state.clone());

    let tagged_movie = insert_movie(&state, "Tagged", &["Action"], false).await;
    let untagged_movie = insert_movie(&state, "Untagged", &[], false).await;

    let unsubscribed = insert_user(&state, users::SubscriptionTier::Free, &[]).await;
    let (_, json) = access_check(&app, &tagged_movie, &unsubscribed).await;
    assert_eq!(json["has_access"], false);

    let subscribed = insert_user(&state, users::SubscriptionTier::Free, &["Action"]).await;
    let (_, json) = access_check(&app, &untagged_movie, &subscribed).await;
    assert_eq!(json["has_access"], false);
}

#[tokio::test]
async fn premium_tier_alone_grants_nothing() {
    let state = setup_state().await;
    let movie_id = insert_movie(&state, "Exclusive", &["Thriller"], false).await;
    let app = create_app(state.clone());

    let premium_without_category =
        insert_user(&state, users::SubscriptionTier::Premium, &["Comedy"]).await;
    let (_, json) = access_check(&app, &movie_id, &premium_without_category).await;
    assert_eq!(json["has_access"], false);
}

#[tokio::test]
async fn access_check_requires_a_session_and_an_existing_movie() {
    let state = setup_state().await;
    let movie_id = insert_movie(&state, "Dark", &["Thriller"], false).await;
    let app = create_app(state.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/movies/{}/access", movie_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = insert_user(&state, users::SubscriptionTier::Free, &[]).await;
    let (status, _) = access_check(&app, "missing-id", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movie_listing_supports_search_featured_and_category_facets() {
    let state = setup_state().await;
    insert_movie(&state, "Dark Waters", &["Drama"], true).await;
    insert_movie(&state, "Dark", &["Thriller"], false).await;
    insert_movie(&state, "Sunlight", &["Drama"], false).await;
    let app = create_app(state);

    let (status, json) = get_json(&app, "/movies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (_, json) = get_json(&app, "/movies?q=Dark").await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = get_json(&app, "/movies?featured=true").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Dark Waters");

    let (_, json) = get_json(&app, "/movies?category=Drama").await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = get_json(&app, "/movies?q=Dark&category=Thriller").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Dark");
}

#[tokio::test]
async fn public_lookup_returns_full_movie_or_404() {
    let state = setup_state().await;
    let movie_id = insert_movie(&state, "Dark", &["Thriller", "Drama"], false).await;
    let app = create_app(state);

    let (status, json) = get_json(&app, &format!("/movies/{}", movie_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Dark");
    assert_eq!(json["category"], serde_json::json!(["Thriller", "Drama"]));

    let (status, _) = get_json(&app, "/movies/unknown-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_listing_is_public_and_sorted_by_name() {
    let state = setup_state().await;
    for name in ["Zebra", "Action", "Mystery"] {
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            description: Set(String::new()),
            thumbnail: Set(String::new()),
            is_premium: Set(false),
            created_at: Set(Utc::now()),
        };
        category.insert(&state.db).await.unwrap();
    }
    let app = create_app(state);

    let (status, json) = get_json(&app, "/categories").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Action", "Mystery", "Zebra"]);
}
