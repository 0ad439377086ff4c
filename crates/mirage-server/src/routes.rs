//! HTTP routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mirage_core::errors::{error_code, ErrorCode, StorageError};
use mirage_core::types::Pattern;
use mirage_analysis::taxonomy::explainer;
use serde::Deserialize;
use serde_json::json;

use crate::orchestrator;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/analysis/:id", get(get_analysis).delete(delete_analysis))
        .route("/api/history", get(history))
        .route("/api/stats", get(stats))
        .route("/api/patterns", get(patterns))
        .route("/api/feedback", post(submit_feedback))
        .with_state(state)
}

/// Structured error response: `{"error": {"code": ..., "message": ...}}`.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_code::INVALID_INPUT,
            message: message.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        let status = match &e {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: e.error_code(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "code": self.code, "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "healthy", "in_flight": state.in_flight() }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub prompt: String,
    pub code: String,
}

/// `POST /api/analyze` — Phase A runs synchronously and the preliminary
/// record returns with `status = "processing"`; the linguistic stage
/// completes in the background and callers poll for the final record.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<mirage_core::types::AnalysisRecord>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::invalid("prompt must not be empty"));
    }
    if request.code.len() > state.config.analysis.max_code() {
        return Err(ApiError::invalid(format!(
            "code exceeds the {} byte limit",
            state.config.analysis.max_code()
        )));
    }

    let record = orchestrator::run_analysis(&state, request.prompt, request.code).await?;
    Ok(Json(record))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<mirage_core::types::AnalysisRecord>, ApiError> {
    let record = state.store.get(id)?;
    Ok(Json(record))
}

async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete(id)? {
        return Err(StorageError::NotFound { id }.into());
    }
    Ok(Json(json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(20).min(200);
    let entries = state.store.history(limit)?;
    Ok(Json(json!({ "total": entries.len(), "analyses": entries })))
}

async fn stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.store.stats()?;
    Ok(Json(serde_json::to_value(report).unwrap_or_default()))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub analysis_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
    #[serde(default)]
    pub helpful: bool,
}

async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !(1..=5).contains(&request.rating) {
        return Err(ApiError::invalid("rating must be between 1 and 5"));
    }
    let id = state.store.add_feedback(
        request.analysis_id,
        request.rating,
        request.comment.as_deref(),
        request.helpful,
    )?;
    Ok(Json(json!({ "feedback_id": id })))
}

/// `GET /api/patterns` — the ten-pattern catalog.
async fn patterns() -> impl IntoResponse {
    let entries: Vec<serde_json::Value> = Pattern::all()
        .iter()
        .map(|p| {
            json!({
                "tag": p.tag(),
                "name": p.display_name(),
                "stage": typical_stage(*p),
                "severity_range": severity_range(*p),
                "description": explainer::pattern_blurb(*p),
                "fix_hint": explainer::fix_hint(*p),
            })
        })
        .collect();
    Json(json!({ "total_patterns": entries.len(), "patterns": entries }))
}

fn typical_stage(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::SyntaxError
        | Pattern::HallucinatedObject
        | Pattern::IncompleteGeneration
        | Pattern::SillyMistake => "static",
        Pattern::WrongAttribute | Pattern::WrongInputType => "dynamic",
        Pattern::NonPromptedConsideration
        | Pattern::PromptBiasedCode
        | Pattern::MissingCornerCase
        | Pattern::Misinterpretation => "linguistic",
    }
}

fn severity_range(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::SyntaxError => "8-10",
        Pattern::HallucinatedObject => "7-9",
        Pattern::IncompleteGeneration => "6-8",
        Pattern::SillyMistake => "5-7",
        Pattern::WrongAttribute => "6-8",
        Pattern::WrongInputType => "5-7",
        Pattern::NonPromptedConsideration => "4-6",
        Pattern::PromptBiasedCode => "5-7",
        Pattern::MissingCornerCase => "4-6",
        Pattern::Misinterpretation => "6-9",
    }
}
