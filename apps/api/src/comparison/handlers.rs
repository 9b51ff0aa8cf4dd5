use axum::{extract::State, Json};
use serde_json::Value;

use crate::comparison::pipeline::CompareRequest;
use crate::comparison::variant::Variant;
use crate::errors::AppError;
use crate::state::AppState;

async fn compare(
    state: AppState,
    variant: Variant,
    request: CompareRequest,
) -> Result<Json<Value>, AppError> {
    let result = state.pipeline.run(variant, &request).await?;
    Ok(Json(result))
}

/// POST /api/compare/zero-shot
pub async fn handle_zero_shot(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::ZeroShot, request).await
}

/// POST /api/compare/one-shot
pub async fn handle_one_shot(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::OneShot, request).await
}

/// POST /api/compare/multi-shot
pub async fn handle_multi_shot(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::MultiShot, request).await
}

/// POST /api/compare/system-user
pub async fn handle_system_user(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::SystemUser, request).await
}

/// POST /api/compare/chain-of-thought
pub async fn handle_chain_of_thought(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::ChainOfThought, request).await
}

/// POST /api/compare/structured-output
pub async fn handle_structured_output(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::StructuredOutput, request).await
}

/// POST /api/compare/temperature
pub async fn handle_temperature(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    compare(state, Variant::Temperature, request).await
}
