//! Drinklog server entry point.

use std::sync::Arc;

use axum::{ServiceExt, extract::Request, middleware};
use drinklog_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use drinklog_common::Config;
use drinklog_core::{
    AlcoholTypeService, AnalysisService, CalendarService, CommentService, PostService,
    RecordService, UserService,
};
use drinklog_db::repositories::{
    AlcoholRecordRepository, AlcoholTypeRepository, CommentRepository, PostRepository,
    UserRepository,
};
use tokio::signal;
use tower::Layer;
use tower_http::{
    cors::{Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drinklog=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting drinklog server...");

    let config = Config::load()?;

    let db = drinklog_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    drinklog_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let alcohol_type_repo = AlcoholTypeRepository::new(Arc::clone(&db));
    let record_repo = AlcoholRecordRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    // Services
    let state = AppState {
        user_service: UserService::new(user_repo),
        alcohol_type_service: AlcoholTypeService::new(alcohol_type_repo.clone()),
        record_service: RecordService::new(record_repo.clone(), alcohol_type_repo),
        calendar_service: CalendarService::new(record_repo.clone()),
        analysis_service: AnalysisService::new(record_repo),
        post_service: PostService::new(post_repo.clone()),
        comment_service: CommentService::new(comment_repo, post_repo),
    };

    let router = api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Trailing slashes are trimmed before routing
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
