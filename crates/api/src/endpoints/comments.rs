//! Comment endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use drinklog_common::AppResult;
use drinklog_core::{CommentResponse, CreateCommentInput, LikeToggleResponse, UpdateCommentInput};
use serde::Deserialize;

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Query for listing comments.
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub post_id: Option<String>,
}

async fn list_comments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list(query.post_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(comments))
}

async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(comment))
}

async fn get_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.get(&id, &user.id).await?;
    Ok(ApiResponse::ok(comment))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.update(&id, &user.id, input).await?;
    Ok(ApiResponse::ok(comment))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.comment_service.delete(&id, &user.id).await?;
    Ok(response::ok())
}

async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeToggleResponse>> {
    let result = state.comment_service.toggle_like(&id, &user.id).await?;
    Ok(ApiResponse::ok(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/{id}/like", post(toggle_like))
}
