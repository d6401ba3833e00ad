use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Storage;
use crate::handlers::{folders, notes, tags};
use crate::services::{CatalogService, CleanupCoordinator, NoteService};

/// Everything a handler needs, built once from an explicitly constructed storage client.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub folders: CatalogService,
    pub tags: CatalogService,
    pub notes: NoteService,
    pub cleanup: CleanupCoordinator,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: &AppConfig) -> Self {
        Self {
            folders: CatalogService::folders(storage.clone()),
            tags: CatalogService::tags(storage.clone()),
            notes: NoteService::new(storage.clone()),
            cleanup: CleanupCoordinator::new(storage.clone(), config.cascade.tag_target),
            storage,
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let response_level = if config.api.enable_request_logging {
        Level::INFO
    } else {
        Level::DEBUG
    };

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resources
        .nest("/api", api_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .on_response(DefaultOnResponse::new().level(response_level)),
                )
                .layer(cors_layer(&config.security)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(folders::list).post(folders::create))
        .route(
            "/folders/:id",
            get(folders::show).put(folders::update).delete(folders::delete),
        )
        .route("/tags", get(tags::list).post(tags::create))
        .route(
            "/tags/:id",
            get(tags::show).put(tags::update).delete(tags::delete),
        )
        .route("/notes", get(notes::list).post(notes::create))
        .route("/notes/:id", get(notes::show))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Noteful API (Rust)",
        "version": version,
        "endpoints": {
            "folders": "/api/folders[/:id]",
            "tags": "/api/tags[/:id]",
            "notes": "/api/notes[/:id]",
            "health": "/health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.storage.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

/// Serve until ctrl-c / SIGTERM, then release the storage client.
pub async fn serve(config: AppConfig, storage: Arc<dyn Storage>) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    info!(
        "Noteful API listening on http://{} (tag cascade: {:?})",
        bind_addr, config.cascade.tag_target
    );

    let router = app(AppState::new(storage.clone(), &config), &config);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install ctrl-c handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
