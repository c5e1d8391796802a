use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use qval_engine::EngineError;
use qval_report::ValuationReport;
use qval_types::AssetParams;
use uuid::Uuid;

use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(session_create))
        .route("/sessions/{id}", get(session_status))
        .route("/sessions/{id}/start", post(session_start))
        .route("/sessions/{id}/reset", post(session_reset))
        .route("/sessions/{id}/report", get(session_report))
}

#[derive(Debug)]
enum ApiError {
    UnknownSession,
    Busy,
    Invalid(String),
    ReportNotReady,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Busy => ApiError::Busy,
            EngineError::InvalidParams(cause) => ApiError::Invalid(cause.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::UnknownSession => (
                StatusCode::NOT_FOUND,
                "unknown_session",
                "no such session".to_string(),
            ),
            ApiError::Busy => (
                StatusCode::CONFLICT,
                "busy",
                "a simulation is already running".to_string(),
            ),
            ApiError::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_params", message),
            ApiError::ReportNotReady => (
                StatusCode::CONFLICT,
                "report_not_ready",
                "simulation has not completed".to_string(),
            ),
        };
        let body = serde_json::json!({ "code": code, "message": message });
        (status, Json(body)).into_response()
    }
}

fn status_body(state: &qval_types::SimulationState) -> serde_json::Value {
    serde_json::json!({
        "status": state.status_label(),
        "progress": state.progress(),
        "message": state.message(),
    })
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn session_create(State(state): State<AppState>) -> impl IntoResponse {
    let id = state.registry.create();
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    )
}

async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.registry.get(&id).ok_or(ApiError::UnknownSession)?;
    Ok(Json(status_body(&session.snapshot())))
}

async fn session_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(params): Json<AssetParams>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.registry.get(&id).ok_or(ApiError::UnknownSession)?;
    // The handle drives itself to completion; the caller polls for status.
    let _handle = session.start(params)?;
    Ok((StatusCode::ACCEPTED, Json(status_body(&session.snapshot()))))
}

async fn session_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.registry.get(&id).ok_or(ApiError::UnknownSession)?;
    session.reset();
    Ok(Json(status_body(&session.snapshot())))
}

async fn session_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.registry.get(&id).ok_or(ApiError::UnknownSession)?;
    let snapshot = session.snapshot();
    match (snapshot.result(), snapshot.params()) {
        (Some(result), Some(params)) => Ok(Json(ValuationReport::build(result, params))),
        _ => Err(ApiError::ReportNotReady),
    }
}
