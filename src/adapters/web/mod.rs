//! HTTP API adapter.
//!
//! Serves the weekly report as JSON under `/api`, plus an optional static
//! frontend directory. Unknown `/api` paths get a JSON 404; anything else
//! falls through to the frontend's `index.html`.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::CompanyView;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::domain::company::Company;
use crate::domain::error::ArbError;
use crate::domain::report::WeeklyAlphaReport;

/// Read-only state shared by every request.
pub struct AppState {
    pub report: WeeklyAlphaReport,
    pub companies: Vec<Company>,
}

pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/summary", get(handlers::summary))
        .route("/signals", get(handlers::signals))
        .route("/signals/{rank}", get(handlers::signal_by_rank))
        .route("/bottlenecks", get(handlers::bottlenecks))
        .route("/companies", get(handlers::companies))
        .route("/heatmap", get(handlers::heatmap))
        .route("/second-order", get(handlers::second_order))
        .fallback(handlers::api_not_found);

    let router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api);

    let router = match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(handlers::api_not_found),
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(
    state: AppState,
    static_dir: Option<PathBuf>,
    addr: SocketAddr,
) -> Result<(), ArbError> {
    let router = build_router(state, static_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api listening");
    axum::serve(listener, router).await?;
    Ok(())
}
