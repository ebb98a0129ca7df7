//! Static payload for the /health endpoint.
//! Built once at startup from the config; never mutated.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::routes::ApiState;
use crate::config::Config;

#[derive(Debug, Clone, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
    /// False when GENAI_API_KEY is missing; video analysis will fail.
    pub genai_configured: bool,
    pub genai_model: String,
    pub statcast_range: (String, String),
    pub risk_factors: Vec<String>,
}

impl HealthInfo {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            genai_configured: cfg.genai_api_key.is_some(),
            genai_model: cfg.genai_model.clone(),
            statcast_range: (cfg.statcast_start.to_string(), cfg.statcast_end.to_string()),
            risk_factors: cfg.risk_factors.iter().map(|f| f.name.clone()).collect(),
        }
    }
}

pub async fn health(State(state): State<ApiState>) -> Json<HealthInfo> {
    Json(state.health.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_key() {
        let info = HealthInfo::from_config(&Config::default());
        assert!(!info.genai_configured);
        assert_eq!(info.statcast_range.0, "2024-04-01");
        assert_eq!(info.risk_factors.len(), 5);
    }

    #[test]
    fn reports_configured_key() {
        let cfg = Config {
            genai_api_key: Some("k".to_string()),
            ..Config::default()
        };
        assert!(HealthInfo::from_config(&cfg).genai_configured);
    }
}
