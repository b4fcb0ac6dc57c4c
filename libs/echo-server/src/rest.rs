use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use echo_api::{JsonFormat, WireFormat};

use crate::error::ServeError;

/// Echo-сервис текстового протокола (JSON over HTTP).
pub fn router() -> Router {
    Router::new()
        .route("/api", post(handle_echo))
        .route("/health", get(handle_health))
}

pub async fn serve(listener: TcpListener, shutdown: CancellationToken) -> Result<(), ServeError> {
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(ServeError::Io)
}

// ═══════════════════════════════════════════════════════════════
//  REST: POST /api
// ═══════════════════════════════════════════════════════════════

// Тело читается как Bytes: Content-Type не проверяется,
// любая ошибка разбора — 400.
async fn handle_echo(body: Bytes) -> Response {
    let record = match JsonFormat.decode(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, len = body.len(), "rejected request body");
            return (StatusCode::BAD_REQUEST, "Invalid request").into_response();
        }
    };

    match JsonFormat.encode(&record.bumped()) {
        Ok(json) => ([(header::CONTENT_TYPE, JsonFormat.content_type())], json).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "encode response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  REST: GET /health
// ═══════════════════════════════════════════════════════════════

async fn handle_health() -> &'static str {
    "ok"
}
