//! Account endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use drinklog_common::AppResult;
use drinklog_core::{ChangePasswordInput, CreateUserInput, UserResponse};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Acknowledgement of a password change.
#[derive(Debug, Serialize)]
pub struct PasswordChanged {
    pub status: &'static str,
}

/// Create a new account.
async fn join(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.join(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (token, user) = state
        .user_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ChangePasswordInput>,
) -> AppResult<ApiResponse<PasswordChanged>> {
    state.user_service.change_password(&user, input).await?;
    Ok(ApiResponse::ok(PasswordChanged {
        status: "password set",
    }))
}

/// The caller's own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Every account. Admin only.
async fn list_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list_all(&user).await?;
    Ok(ApiResponse::ok(users))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/login", post(login))
        .route("/change-password", put(change_password))
        .route("/me", get(me))
        .route("/users", get(list_users))
}
