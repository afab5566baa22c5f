//! HTTP API server
//!
//! Axum-based server exposing the extractor over `GET /extractnews`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use articlekit::{ErrorResult, ExtractError, Extraction, ExtractionRequest, Extractor};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Greeting served on `/`, kept byte-for-byte for existing clients
pub const GREETING: &str = "Hello from Flask!";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/extractnews", get(extract_news))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn hello() -> &'static str {
    GREETING
}

async fn extract_news(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let url = first_param(&params, "q").unwrap_or_default().to_string();

    match state.extractor.extract(ExtractionRequest::new(url.as_str())).await {
        Ok(extraction @ Extraction::Article(_)) => (StatusCode::OK, Json(extraction)).into_response(),
        Ok(extraction @ Extraction::Failed(_)) => {
            warn!(url = %url, "Article analysis failed");
            (StatusCode::OK, Json(extraction)).into_response()
        }
        Err(e) => error_response(&url, e),
    }
}

/// Value of the first occurrence of `name`; repeats are ignored
fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn error_response(url: &str, err: ExtractError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(url = %url, error = %err, "Extraction failed");
    }
    (status, Json(ErrorResult::new(err.to_string()))).into_response()
}

/// Bind `addr` and serve until Ctrl-C
pub async fn run(addr: SocketAddr, extractor: Extractor) -> Result<()> {
    let app = create_router(AppState::new(extractor));

    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind HTTP server")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("HTTP server shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
