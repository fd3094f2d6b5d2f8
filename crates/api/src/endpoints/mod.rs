//! API endpoints.

mod alcohol_types;
mod analysis;
mod auth;
mod calendar;
mod comments;
mod posts;
mod records;
mod user;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/records", records::router())
        .nest("/calendar", calendar::router())
        .nest("/analysis", analysis::router())
        .nest("/alcohol-types", alcohol_types::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/user", user::router())
}
