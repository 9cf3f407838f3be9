use super::AppState;
use crate::domain::model::{ErrorBody, ExplainResponse, GenerateRequest};
use crate::utils::error::StudioError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;

const FALLBACK_INDEX: &str = include_str!("../../templates/index.html");

/// Error half of every JSON endpoint: a status and `{"error": ...}`.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_configured() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            StudioError::LlmNotConfigured.to_string(),
        )
    }

    /// Maps a studio error, prefixing the message the way the endpoint wants.
    fn from_studio(err: StudioError, prefix: &str) -> Self {
        let status = match &err {
            StudioError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            StudioError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                "Request failed: {} (category: {:?}, severity: {:?})",
                err,
                err.category(),
                err.severity()
            );
            Self::new(status, format!("{}{}", prefix, err))
        } else {
            Self::new(status, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

fn required_string(body: &Result<Json<Value>, JsonRejection>, field: &str) -> Option<String> {
    match body {
        Ok(Json(value)) => value.get(field)?.as_str().map(str::to_string),
        Err(_) => None,
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let path = state.templates_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page),
        Err(e) => {
            tracing::debug!("Serving built-in index page ({}: {})", path.display(), e);
            Html(FALLBACK_INDEX.to_string())
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "llm_configured": state.studio.is_llm_configured(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    if !state.studio.is_llm_configured() {
        return Err(ApiError::not_configured());
    }
    let Some(prompt) = required_string(&body, "prompt") else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Prompt is required."));
    };

    let value = body.map(|Json(v)| v).unwrap_or_default();
    let request = GenerateRequest {
        prompt,
        aspect_ratio: value.get("aspectRatio").and_then(Value::as_str).map(str::to_string),
        quality: value.get("quality").and_then(Value::as_str).map(str::to_string),
    };

    let response = state
        .studio
        .generate(&request)
        .await
        .map_err(|e| ApiError::from_studio(e, "An error occurred: "))?;

    serde_json::to_value(response)
        .map(Json)
        .map_err(|e| ApiError::from_studio(e.into(), "An error occurred: "))
}

pub async fn suggest_prompts(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state
        .studio
        .suggest_prompts()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_studio(e, ""))
}

pub async fn explain_code(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    if !state.studio.is_llm_configured() {
        return Err(ApiError::not_configured());
    }
    let Some(code) = required_string(&body, "code") else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Code is required."));
    };

    let explanation = state
        .studio
        .explain_code(&code)
        .await
        .map_err(|e| ApiError::from_studio(e, ""))?;
    Ok(Json(ExplainResponse { explanation }))
}
