//! HTTP server.
//!
//! Exposes the validation workflow as a JSON API for the browser frontend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/validate` | Run a validation for `{"url": "..."}` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Every failure, including an unreadable request body, is reported as
//! HTTP 500 with a single message:
//!
//! ```json
//! { "error": "failed to extract metadata from http://x.com: 404 Not Found" }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the frontend can be
//! served from a different origin.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::validate::{ValidationReport, Validator};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    validator: Arc<Validator>,
}

/// Starts the HTTP server with collaborators built from `config`.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let validator = Validator::from_config(config)?;
    run_server_with(config, Arc::new(validator)).await
}

/// Starts the HTTP server around an existing [`Validator`].
///
/// Lets embedders and tests supply their own extractor, search provider,
/// or store.
pub async fn run_server_with(config: &Config, validator: Arc<Validator>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(validator);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind = %bind_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
pub fn router(validator: Arc<Validator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/validate", post(handle_validate))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { validator })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.message, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<metacheck_core::Error> for AppError {
    fn from(err: metacheck_core::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            message: rejection.body_text(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /validate ============

#[derive(Deserialize)]
struct ValidateRequest {
    url: String,
}

/// Handler for `POST /validate`.
///
/// Runs the whole pipeline for the submitted URL and returns the
/// [`ValidationReport`] as JSON.
async fn handle_validate(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, AppError> {
    let Json(request) = payload?;
    let report = state.validator.validate(&request.url).await?;
    Ok(Json(report))
}
