use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dexarb_models::advisory::{AdvisoryResult, AdvisorySource};
use dexarb_models::report::{ArbitrageReport, PricesReport, QuotePair};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ServiceError;
use crate::service::ArbService;

type AppState = Arc<ArbService>;

/// JSON error body `{"error": ".."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_client_error() {
            return Self::bad_request(e.to_string());
        }
        error!(error = %e, "Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Quotes to reason about instead of fetching fresh ones.
    #[serde(default)]
    pub context: Option<QuotePair>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: AdvisoryResult,
    pub source: AdvisorySource,
}

async fn banner() -> &'static str {
    "dexarb: two-pool DEX arbitrage advisor"
}

async fn health(State(service): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "generator": service.generator_name(),
    }))
}

async fn prices(State(service): State<AppState>) -> Result<Json<PricesReport>, ApiError> {
    Ok(Json(service.prices().await?))
}

async fn arbitrage(State(service): State<AppState>) -> Result<Json<ArbitrageReport>, ApiError> {
    Ok(Json(service.arbitrage(None).await?))
}

async fn ask(
    State(service): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing 'question' field"))?;

    let outcome = service.ask(question, request.context.as_ref()).await?;
    Ok(Json(AskResponse {
        response: outcome.result,
        source: outcome.source,
    }))
}

/// The HTTP API: `GET /`, `GET /health`, `GET /prices`, `GET /arbitrage`, `POST /ai`.
pub fn router(service: Arc<ArbService>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/prices", get(prices))
        .route("/arbitrage", get(arbitrage))
        .route("/ai", post(ask))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Serve the API on `bind` until `cancel` fires.
pub async fn serve(
    service: Arc<ArbService>,
    bind: &str,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("API server stopped");
    Ok(())
}
