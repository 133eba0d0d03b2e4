//! HTTP ingress endpoint

use crate::{EventSink, WebhookError, WebhookReceiver};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the ingress routes
#[derive(Clone)]
pub struct IngressState {
    receiver: Arc<WebhookReceiver>,
    sink: Arc<dyn EventSink>,
}

impl IngressState {
    pub fn new(receiver: Arc<WebhookReceiver>, sink: Arc<dyn EventSink>) -> Self {
        Self { receiver, sink }
    }
}

/// Build the router: `POST {path}` for deliveries and `GET /healthz`.
pub fn router(path: &str, state: IngressState) -> Router {
    Router::new()
        .route(path, post(ingest))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Webhook ingress listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn ingest(
    State(state): State<IngressState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let envelope = state.receiver.handle_http(&body, &headers)?;
    let id = envelope.id.clone();
    state.sink.emit(envelope).await?;
    Ok(Json(json!({ "received": true, "id": id })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self, "Webhook delivery failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
