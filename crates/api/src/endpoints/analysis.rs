//! Drinking analysis endpoint.

use axum::{Router, extract::State, routing::get};
use drinklog_common::AppResult;
use drinklog_core::AnalysisReport;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AnalysisReport>> {
    let today = chrono::Utc::now().date_naive();
    let report = state.analysis_service.report(&user.id, today).await?;
    Ok(ApiResponse::ok(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(report))
}
