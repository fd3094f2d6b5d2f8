//! Alcohol record endpoints.
//!
//! Every route operates on the caller's own records.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use drinklog_common::AppResult;
use drinklog_core::{CreatedRecords, RecordPayload, RecordResponse, UpdateRecordInput};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::{self, ApiResponse},
};

async fn list_records(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RecordResponse>>> {
    let records = state.record_service.list(&user.id).await?;
    Ok(ApiResponse::ok(records))
}

/// Create one record, or several when the body is an array.
async fn create_records(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordPayload>,
) -> AppResult<ApiResponse<CreatedRecords>> {
    let created = state.record_service.create(&user.id, payload).await?;
    Ok(ApiResponse::created(created))
}

async fn get_record(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<ApiResponse<RecordResponse>> {
    let record = state.record_service.get_by_date(&user.id, &date).await?;
    Ok(ApiResponse::ok(record))
}

async fn update_record(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(date): Path<String>,
    ApiJson(input): ApiJson<UpdateRecordInput>,
) -> AppResult<ApiResponse<RecordResponse>> {
    let record = state
        .record_service
        .update_by_date(&user.id, &date, input)
        .await?;
    Ok(ApiResponse::ok(record))
}

async fn delete_record(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.record_service.delete_by_date(&user.id, &date).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_records))
        .route(
            "/{date}",
            get(get_record).put(update_record).delete(delete_record),
        )
}
