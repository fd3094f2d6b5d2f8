//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use drinklog_core::{
    AlcoholTypeService, AnalysisService, CalendarService, CommentService, PostService,
    RecordService, UserService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub alcohol_type_service: AlcoholTypeService,
    pub record_service: RecordService,
    pub calendar_service: CalendarService,
    pub analysis_service: AnalysisService,
    pub post_service: PostService,
    pub comment_service: CommentService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` (or `Token <token>`) to a user and
/// stores it in the request extensions. Requests without a valid token pass
/// through unauthenticated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&req) {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Token rejected"),
        }
    }

    next.run(req).await
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
