//! Listings of the caller's own community activity.

use axum::{Router, extract::State, routing::get};
use drinklog_common::AppResult;
use drinklog_core::{CommentResponse, PostResponse};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn my_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state.post_service.list_by_user(&user.id).await?;
    Ok(ApiResponse::ok(posts))
}

async fn my_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_by_user(&user.id).await?;
    Ok(ApiResponse::ok(comments))
}

async fn liked_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state.post_service.liked_by_user(&user.id).await?;
    Ok(ApiResponse::ok(posts))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(my_posts))
        .route("/comments", get(my_comments))
        .route("/liked-posts", get(liked_posts))
}
