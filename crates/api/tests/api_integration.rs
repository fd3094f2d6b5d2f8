//! API integration tests.
//!
//! Drive the router with a mock database behind the services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
};
use chrono::{NaiveDate, Utc};
use drinklog_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use drinklog_core::{
    AlcoholTypeService, AnalysisService, CalendarService, CommentService, PostService,
    RecordService, UserService,
};
use drinklog_db::{
    entities::user,
    repositories::{
        AlcoholRecordRepository, AlcoholTypeRepository, CommentRepository, PostRepository,
        UserRepository,
    },
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A signed-in user the mock database hands back for any token lookup.
fn test_user(id: &str, is_admin: bool) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: format!("{id}_name"),
        nickname: format!("{id}_nick"),
        password: "$argon2id$placeholder".to_string(),
        gender: "female".to_string(),
        birthdate: NaiveDate::from_ymd_opt(1993, 4, 12).unwrap(),
        token: Some("valid-token".to_string()),
        is_admin,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Create test app state with mock database.
fn create_test_state(db: MockDatabase) -> AppState {
    let db = Arc::new(db.into_connection());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let alcohol_type_repo = AlcoholTypeRepository::new(Arc::clone(&db));
    let record_repo = AlcoholRecordRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(db);

    AppState {
        user_service: UserService::new(user_repo),
        alcohol_type_service: AlcoholTypeService::new(alcohol_type_repo.clone()),
        record_service: RecordService::new(record_repo.clone(), alcohol_type_repo),
        calendar_service: CalendarService::new(record_repo.clone()),
        analysis_service: AnalysisService::new(record_repo),
        post_service: PostService::new(post_repo.clone()),
        comment_service: CommentService::new(comment_repo, post_repo),
    }
}

/// Create the test router with authentication applied.
fn create_test_router(db: MockDatabase) -> Router {
    let state = create_test_state(db);
    api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// A mock database whose first query resolves the bearer token to `user`.
fn signed_in(user: user::Model) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]])
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header(header::AUTHORIZATION, "Bearer valid-token")
        .body(Body::empty())
        .unwrap()
}

fn authed_json(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::AUTHORIZATION, "Bearer valid-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_records_require_authentication() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/records")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]),
    );

    let response = app.oneshot(authed_get("/analysis")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_record_with_malformed_date_is_bad_request() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app.oneshot(authed_get("/records/2024-3-1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Invalid date format. Use YYYY-MM-DD.")
    );
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let app = create_test_router(
        signed_in(test_user("user1", false))
            .append_query_results([Vec::<drinklog_db::entities::alcohol_record::Model>::new()]),
    );

    let response = app.oneshot(authed_get("/records/2024-03-01")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_me_returns_profile_without_secrets() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app.oneshot(authed_get("/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "user1_name");
    assert!(json["data"].get("password").is_none());
    assert!(json["data"].get("token").is_none());
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app.oneshot(authed_get("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_calendar_of_another_user_is_forbidden() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app
        .oneshot(authed_get("/calendar/user2/2024/3"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_calendar_invalid_month_is_bad_request() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app
        .oneshot(authed_get("/calendar/user1/2024/13"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_with_invalid_json_returns_error() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/join")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_join_with_short_password_is_rejected() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/join")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"alice","nickname":"ally","password":"short","gender":"female","birthdate":"1995-05-05"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_unknown_user_is_bad_request() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"ghost","password":"password123"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_record_reports_missing_field() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app
        .oneshot(authed_json(
            "POST",
            "/records",
            r#"{"date":"2024-03-01","alcohol_type_id":"soju","servings":2,"drinking_duration":60,"weather":"sunny"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("mood"), "{message}");
}

#[tokio::test]
async fn test_create_record_reports_malformed_body_date() {
    let app = create_test_router(signed_in(test_user("user1", false)));

    let response = app
        .oneshot(authed_json(
            "POST",
            "/records",
            r#"{"date":"2024/03/01","alcohol_type_id":"soju","servings":2,"drinking_duration":60,"weather":"sunny","mood":"happy"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("date: "), "{message}");
}

#[tokio::test]
async fn test_change_password_acknowledges() {
    let salt = SaltString::generate(&mut OsRng);
    let mut user = test_user("user1", false);
    user.password = Argon2::default()
        .hash_password(b"old-password", &salt)
        .unwrap()
        .to_string();

    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user]]),
    );

    let response = app
        .oneshot(authed_json(
            "PUT",
            "/change-password",
            r#"{"old_password":"old-password","new_password":"new-password-123"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "password set");
}
