use crate::catalog::{start_cleanup_task, Catalog, MetadataStore, SqliteMetadataStore};
use crate::config::Config;
use crate::streaming;
use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use reelstream_db::pool::DbPool;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Cached catalog in front of the metadata store
    pub catalog: Arc<Catalog>,
}

impl AppContext {
    /// Build a context whose catalog reads from the given SQLite pool.
    pub fn new(config: Config, db_pool: DbPool) -> Self {
        let store: Arc<dyn MetadataStore> = Arc::new(SqliteMetadataStore::new(db_pool));
        Self::with_store(config, store)
    }

    /// Build a context around any metadata store.
    pub fn with_store(config: Config, store: Arc<dyn MetadataStore>) -> Self {
        let catalog = Catalog::with_config(store, &config.cache);
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = cors_layer(&ctx.config.server.cors_origins);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/video", streaming::video_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::RANGE, header::CONTENT_TYPE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
        ]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Upper bound on the interval between expired-record sweeps
const CACHE_SWEEP_MAX_SECS: u64 = 60;

/// Start the HTTP server and run until a shutdown signal arrives
pub async fn start_server(config: Config, db_pool: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let cache_ttl = config.cache.ttl_secs;
    let ctx = AppContext::new(config, db_pool);

    if let Some(ttl_secs) = cache_ttl {
        start_cleanup_task(
            Arc::clone(&ctx.catalog),
            Duration::from_secs(ttl_secs.clamp(1, CACHE_SWEEP_MAX_SECS)),
        );
    }

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
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
