mod api;
mod config;
mod detector;
mod error;
mod extractor;
mod genai;
mod mlb;
mod pipeline;
mod retry;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthInfo;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::Analyzer;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    if cfg.genai_api_key.is_none() {
        warn!("GENAI_API_KEY not set; /analyze/video and /translate will fail until it is configured.");
    }
    info!(
        model = %cfg.genai_model,
        statcast_start = %cfg.statcast_start,
        statcast_end = %cfg.statcast_end,
        attempts = cfg.analysis_max_attempts,
        "Risk factors: {}",
        cfg.risk_factors
            .iter()
            .map(|f| format!("{} ({} ±{})", f.name, f.field, f.threshold))
            .collect::<Vec<_>>()
            .join(", "),
    );

    let cfg = Arc::new(cfg);
    let state = ApiState {
        analyzer: Arc::new(Analyzer::new(Arc::clone(&cfg))?),
        health: Arc::new(HealthInfo::from_config(&cfg)),
    };
    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
