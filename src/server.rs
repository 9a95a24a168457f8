//! HTTP surface: every request, whatever its path or method, serves the dataset.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpListener;

use crate::error::CacheError;
use crate::response::{CACHE_CONTROL, render_body};
use crate::swr::SwrCache;

#[derive(Debug)]
pub struct ResponseError {
    status: StatusCode,
    err: CacheError,
}

impl From<CacheError> for ResponseError {
    fn from(err: CacheError) -> Self {
        let status = match &err {
            CacheError::MissingCredential | CacheError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CacheError::Upstream { .. } | CacheError::Transport(_) => StatusCode::BAD_GATEWAY,
            CacheError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        ResponseError { status, err }
    }
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            detail: Some(self.err.to_string()),
        };
        (self.status, Json(body)).into_response()
    }
}

/// An error response from the api.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ApiErrorResponse {
    pub detail: Option<String>,
}

async fn read_through(State(cache): State<SwrCache>) -> Result<Response, ResponseError> {
    let served = cache.serve().await?;
    let body = render_body(&served);
    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(body)).into_response())
}

pub fn create_app(cache: SwrCache) -> Router {
    Router::new().fallback(read_through).with_state(cache)
}

/// Serve on `listener` until `shutdown` resolves, then let in-flight refreshes settle.
pub async fn run<F>(listener: TcpListener, cache: SwrCache, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Starting HTTP server on {}", addr);
    }

    axum::serve(listener, create_app(cache.clone()))
        .with_graceful_shutdown(shutdown)
        .await?;

    let tasks = cache.coordinator().tasks();
    tasks.close();
    if !tasks.is_empty() {
        tracing::info!(pending = tasks.len(), "waiting for background refreshes");
    }
    tasks.wait().await;

    tracing::info!("System shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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
