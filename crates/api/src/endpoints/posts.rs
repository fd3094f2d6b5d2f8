//! Community post endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use drinklog_common::AppResult;
use drinklog_core::{CreatePostInput, LikeToggleResponse, PostResponse, UpdatePostInput};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::{self, ApiResponse},
};

async fn list_posts(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state.post_service.list().await?;
    Ok(ApiResponse::ok(posts))
}

async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(post))
}

async fn get_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.get(&id, &user.id).await?;
    Ok(ApiResponse::ok(post))
}

async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.update(&id, &user.id, input).await?;
    Ok(ApiResponse::ok(post))
}

async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(&id, &user.id).await?;
    Ok(response::ok())
}

/// Like or unlike a post.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeToggleResponse>> {
    let result = state.post_service.toggle_like(&id, &user.id).await?;
    Ok(ApiResponse::ok(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/like", post(toggle_like))
}
