pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use state::{AppState, Session};

/// Build the dashboard router around an existing state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(|| async { "ok" }))
        .route("/api/upload", post(handlers::data::upload))
        .route("/api/session", get(handlers::data::get_session))
        .route("/api/view", post(handlers::view::view))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Entry point for the `serve` command.
///
/// A `preload` file that fails to load does not stop the server; the error
/// is shown on the page instead.
pub async fn serve(config: AppConfig, preload: Option<&Path>) -> Result<()> {
    let addr = format!("{}:{}", config.dashboard.host, config.dashboard.port);
    let state = AppState::new(config);

    if let Some(path) = preload {
        let name = path.display().to_string();
        let loaded = std::fs::read(path)
            .with_context(|| format!("reading {name}"))
            .and_then(|bytes| Session::load(&name, bytes).map_err(anyhow::Error::from));
        let mut inner = state.inner.write().await;
        match loaded {
            Ok(session) => {
                info!("Preloaded {} ({} rows)", name, session.rows.len());
                inner.session = Some(session);
            }
            Err(e) => {
                warn!("Could not preload {name}: {e:#}");
                inner.last_error = Some(format!("{e:#}"));
            }
        }
    }

    let app = router(state);

    info!("portfolio-lens dashboard listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}
