//! Alcohol type catalog endpoints.

use axum::{Router, extract::State, routing::get};
use drinklog_common::AppResult;
use drinklog_core::{AlcoholTypeResponse, CreateAlcoholTypeInput};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

async fn list_types(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AlcoholTypeResponse>>> {
    let types = state.alcohol_type_service.list().await?;
    Ok(ApiResponse::ok(types))
}

async fn create_type(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateAlcoholTypeInput>,
) -> AppResult<ApiResponse<AlcoholTypeResponse>> {
    let created = state.alcohol_type_service.create(&user, input).await?;
    Ok(ApiResponse::created(created))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_types).post(create_type))
}
