use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get_service, post};
use axum::{Json, Router};
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tape_ai::{Gateway, GatewayError};
use tape_core::SnippetValidator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod config;

pub use config::{ConfigError, DEFAULT_PORT, ServerConfig};

#[derive(Clone)]
struct AppState {
    gateway: Arc<Gateway>,
    validator: Arc<SnippetValidator>,
}

/// API routes only.
pub fn app(gateway: Gateway) -> Router {
    router(gateway, None)
}

/// API routes with every other path served from `static_dir`.
pub fn app_serving(gateway: Gateway, static_dir: impl AsRef<Path>) -> Router {
    router(gateway, Some(ServeDir::new(static_dir)))
}

fn router(gateway: Gateway, static_files: Option<ServeDir>) -> Router {
    let state = AppState {
        gateway: Arc::new(gateway),
        validator: Arc::new(SnippetValidator::new()),
    };

    let router = Router::new()
        .route("/api/generate", post(generate))
        .with_state(state);
    // Static files answer GET and HEAD only; everything else unmatched is 404.
    let router = match static_files {
        Some(files) => {
            let files: MethodRouter = get_service(files).fallback(endpoint_not_found);
            router.fallback_service(files)
        }
        None => router.fallback(endpoint_not_found),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GenerateResponse {
    success: bool,
    code: String,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
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

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::MissingPrompt => Self::bad_request(err.to_string()),
            GatewayError::NotConfigured => Self::internal(err.to_string()),
            GatewayError::Upstream(_) => {
                tracing::error!(error = %err, "error generating object");
                Self::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request: GenerateRequest = parse_json(&body)?;
    let code = state.gateway.generate(&request.prompt).await?;

    // Relayed as-is either way.
    if let Some(missing) = state.validator.first_missing(&code) {
        tracing::warn!(%missing, "model reply does not match the snippet contract");
    }

    Ok(Json(GenerateResponse {
        success: true,
        code,
        prompt: request.prompt,
    }))
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("request body is required"));
    }

    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request(format!("invalid JSON body: {err}")))
}
