use crate::config::Config;
use crate::streaming::{PlaylistCache, UrlSigner};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use versecast_common::Error;
use versecast_db::pool::{init_pool, DbPool};

pub mod routes_playlists;
pub mod routes_stream;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Catalog connection pool
    pub db_pool: DbPool,
    /// Segment URL signer
    pub signer: Arc<UrlSigner>,
    /// Assembled-playlist cache (pre-signing)
    pub playlist_cache: Arc<PlaylistCache>,
}

/// Response-side wrapper mapping domain errors to HTTP statuses.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) | Error::VariantUnavailable(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
                tracing::error!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// M3U8 text response with the HLS content type.
pub fn m3u8_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/x-mpegURL")],
        body,
    )
        .into_response()
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/stream", routes_stream::routes())
        .nest("/playlists", routes_playlists::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let db_pool = init_pool(&config.server.db_path)
        .with_context(|| format!("Failed to open database {:?}", config.server.db_path))?;

    let signer = Arc::new(UrlSigner::new(&config.signing));
    let playlist_cache = Arc::new(PlaylistCache::new(
        config.streaming.cache_capacity,
        config.streaming.cache_ttl_secs,
    ));

    let ctx = AppContext {
        config: Arc::new(config),
        db_pool,
        signer,
        playlist_cache,
    };

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
