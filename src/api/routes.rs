use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::health::{health, HealthInfo};
use crate::error::AppError;
use crate::pipeline::Analyzer;
use crate::types::{Language, PlayerOutcome, VideoReport};

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<Analyzer>,
    pub health: Arc<HealthInfo>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze/video", post(analyze_video))
        .route("/players/:name/risk", get(player_risk))
        .route("/translate", post(translate))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AnalyzeVideoRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub language: Language,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn analyze_video(
    State(state): State<ApiState>,
    Json(req): Json<AnalyzeVideoRequest>,
) -> Result<Json<VideoReport>, AppError> {
    let report = state.analyzer.analyze_video(&req.url, req.language).await?;
    info!(
        metrics_found = report.metrics_found,
        players = report.players.len(),
        "video analysis served"
    );
    Ok(Json(report))
}

async fn player_risk(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerOutcome>, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("Please enter a player name.".to_string()));
    }
    Ok(Json(state.analyzer.analyze_player(&name).await?))
}

async fn translate(
    State(state): State<ApiState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::InvalidInput("Nothing to translate.".to_string()));
    }
    let text = state.analyzer.translate(&req.text, req.language).await?;
    Ok(Json(TranslateResponse {
        language: req.language,
        text,
    }))
}
