use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::get,
    Router,
};
use configuration::Settings;
use database::{ConnectionManager, PgConnectionManager};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod pipeline;

/// Request bodies are small JSON records.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The shared application state that all handlers can access.
///
/// It carries no data of its own, only the way to reach the store.
#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<dyn ConnectionManager>,
}

impl AppState {
    pub fn new(connections: Arc<dyn ConnectionManager>) -> Self {
        Self { connections }
    }
}

/// Builds the route table. Called once at startup; nothing is registered later.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route(
            "/members/:id",
            get(handlers::get_member)
                .put(handlers::update_member)
                .delete(handlers::remove_member),
        )
        .route(
            "/workoutsessions",
            get(handlers::list_workouts).post(handlers::schedule_workout),
        )
        .route(
            "/workoutsessions/:session_id/:member_id",
            get(handlers::get_workout)
                .put(handlers::update_workout)
                .delete(handlers::cancel_workout),
        )
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every request inside a span tagged with a fresh request id.
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let connections = PgConnectionManager::from_settings(&settings.database)?;
    tracing::info!(
        host = %connections.options().get_host(),
        database = ?connections.options().get_database(),
        "Using a new database connection per request."
    );

    let app = build_router(AppState::new(Arc::new(connections)));

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
