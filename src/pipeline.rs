use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, ACCEPTED_VIDEO_PREFIXES};
use crate::detector::RiskDetector;
use crate::error::{AppError, Result, GENERIC_ERROR_MESSAGE};
use crate::extractor::extract;
use crate::genai::GenAiClient;
use crate::mlb::statcast::sort_recent_first;
use crate::mlb::MlbClients;
use crate::retry::with_fixed_attempts;
use crate::types::{Language, ParsedAnalysis, PlayerOutcome, PlayerReport, SeasonStats, VideoReport};

pub const NO_METRICS_MESSAGE: &str = "No Statcast metrics were detected in this video.";
pub const NO_RISKS_MESSAGE: &str = "No significant injury risks detected.";
pub const NO_INJURIES_MESSAGE: &str = "No past injuries found.";
pub const NAMES_UNAVAILABLE_MESSAGE: &str =
    "Players mentioned in this video could not be identified, so no risk reports are included.";

/// Runs one user action end to end. External calls are made one at a time;
/// nothing is kept between actions.
pub struct Analyzer {
    cfg: Arc<Config>,
    genai: GenAiClient,
    mlb: MlbClients,
    detector: RiskDetector,
}

impl Analyzer {
    pub fn new(cfg: Arc<Config>) -> Result<Self> {
        let genai = GenAiClient::new(&cfg)?;
        let mlb = MlbClients::new(&cfg)?;
        let detector =
            RiskDetector::new(cfg.risk_factors.clone()).with_recent_count(cfg.recent_sample_count);
        Ok(Self {
            cfg,
            genai,
            mlb,
            detector,
        })
    }

    /// Video URL → model analysis → players mentioned → per-player risk.
    pub async fn analyze_video(&self, video_url: &str, language: Language) -> Result<VideoReport> {
        let video_url = validate_video_url(video_url)?;
        info!(video_url, %language, "analyzing video");

        let raw = with_fixed_attempts("analysis", self.cfg.analysis_max_attempts, || {
            self.genai.analyze_video(video_url)
        })
        .await?;

        let parsed = extract(&raw);
        info!(video_url, chars = raw.len(), metrics_found = parsed.metrics_found(), "analysis received");
        let analysis = match parsed {
            ParsedAnalysis::MetricsFound { analysis } => analysis,
            ParsedAnalysis::NoMetrics => {
                return Ok(VideoReport {
                    video_url: video_url.to_string(),
                    metrics_found: false,
                    analysis: None,
                    language,
                    message: Some(NO_METRICS_MESSAGE.to_string()),
                    players: Vec::new(),
                });
            }
        };

        let translated = self.translate(&analysis, language).await?;

        let (players, message) = match self.genai.extract_player_names(&analysis).await {
            Ok(names) => (self.analyze_players(&names).await, None),
            Err(e) => {
                warn!(video_url, "player name extraction failed: {e}");
                (Vec::new(), Some(NAMES_UNAVAILABLE_MESSAGE.to_string()))
            }
        };

        Ok(VideoReport {
            video_url: video_url.to_string(),
            metrics_found: true,
            analysis: Some(translated),
            language,
            message,
            players,
        })
    }

    /// One outcome per non-blank name, in order. A failure for one player
    /// does not affect the others.
    async fn analyze_players(&self, names: &[String]) -> Vec<PlayerOutcome> {
        let mut players = Vec::with_capacity(names.len());
        for name in names.iter().filter(|n| !n.trim().is_empty()) {
            let outcome = match self.analyze_player(name).await {
                Ok(o) => o,
                Err(e) => {
                    warn!(player = %name, "player analysis failed: {e}");
                    PlayerOutcome::Unavailable {
                        query: name.clone(),
                        message: GENERIC_ERROR_MESSAGE.to_string(),
                    }
                }
            };
            players.push(outcome);
        }
        players
    }

    pub async fn translate(&self, text: &str, language: Language) -> Result<String> {
        if language == Language::English {
            return Ok(text.to_string());
        }
        with_fixed_attempts("translation", self.cfg.analysis_max_attempts, || {
            self.genai.translate(text, language)
        })
        .await
    }

    /// Player name → lookup → Statcast trend risks, season line, injuries.
    /// A failed Statcast or injury fetch leaves that section empty.
    pub async fn analyze_player(&self, name: &str) -> Result<PlayerOutcome> {
        let Some(player) = self.mlb.lookup_player(name).await? else {
            return Ok(PlayerOutcome::NotFound {
                query: name.to_string(),
                message: format!("No player found matching '{name}'."),
            });
        };
        info!(player = %player.name, id = player.id, statcast_id = player.statcast_id, "player found");

        let mut messages = Vec::new();

        let mut samples = match self
            .mlb
            .savant
            .fetch_samples(player.statcast_id, self.cfg.statcast_start, self.cfg.statcast_end)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                warn!(player = %player.name, "statcast fetch failed: {e}");
                Vec::new()
            }
        };
        if samples.is_empty() {
            messages.push(format!(
                "No Statcast data found for {} between {} and {}.",
                player.name, self.cfg.statcast_start, self.cfg.statcast_end
            ));
        }

        let season = self.mlb.stats.season_stats(player.id).await.unwrap_or_else(|e| {
            warn!(player = %player.name, "season stats fetch failed: {e}");
            SeasonStats::default()
        });

        let injuries = self.mlb.stats.injury_history(player.id).await.unwrap_or_else(|e| {
            warn!(player = %player.name, "injury history fetch failed: {e}");
            Vec::new()
        });

        sort_recent_first(&mut samples);
        let findings = self.detector.detect(&samples);
        info!(
            player = %player.name,
            samples = samples.len(),
            findings = findings.len(),
            injuries = injuries.len(),
            "risk analysis complete"
        );

        if findings.is_empty() {
            messages.push(NO_RISKS_MESSAGE.to_string());
        }
        if injuries.is_empty() {
            messages.push(NO_INJURIES_MESSAGE.to_string());
        }

        Ok(PlayerOutcome::Found(PlayerReport {
            player,
            season,
            sample_count: samples.len(),
            findings,
            injuries,
            messages,
        }))
    }
}

/// Reject empty input and anything that is not a YouTube link.
pub fn validate_video_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidInput("Please enter a valid video URL.".to_string()));
    }
    if !ACCEPTED_VIDEO_PREFIXES.iter().any(|p| url.starts_with(p)) {
        return Err(AppError::InvalidInput(format!(
            "'{url}' is not a YouTube video URL. Use a link such as https://www.youtube.com/watch?v=..."
        )));
    }
    Ok(url)
}
