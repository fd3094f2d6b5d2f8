//! Calendar endpoint.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use drinklog_common::AppResult;
use drinklog_core::MonthlyConsumption;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Per-date intake for one month.
async fn monthly(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((user_id, year, month)): Path<(String, i32, u32)>,
) -> AppResult<ApiResponse<MonthlyConsumption>> {
    let calendar = state
        .calendar_service
        .monthly(&user, &user_id, year, month)
        .await?;
    Ok(ApiResponse::ok(calendar))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}/{year}/{month}", get(monthly))
}
