use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::types::{MetricField, RiskFactor};

pub const GENAI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const GENAI_MODEL: &str = "gemini-1.5-pro-002";
pub const MLB_API_URL: &str = "https://statsapi.mlb.com";
pub const SAVANT_API_URL: &str = "https://baseballsavant.mlb.com";

/// Default Statcast window queried for risk analysis.
pub const STATCAST_START_DATE: &str = "2024-04-01";
pub const STATCAST_END_DATE: &str = "2024-07-01";

/// Number of newest samples the risk detector looks at.
pub const RECENT_SAMPLE_COUNT: usize = 10;

/// Attempts made at the analysis and translation calls before giving up.
/// No delay between attempts.
pub const ANALYSIS_MAX_ATTEMPTS: u32 = 3;

/// Timeout for the stats APIs (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Timeout for a streamed video analysis (seconds). Long videos take minutes.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 300;

/// URL prefixes accepted as a YouTube video reference.
pub const ACCEPTED_VIDEO_PREFIXES: &[&str] = &[
    "https://www.youtube.com/",
    "https://youtube.com/",
    "https://m.youtube.com/",
    "https://youtu.be/",
];

/// Ordered risk table: (name, field, absolute deviation threshold).
pub fn default_risk_factors() -> Vec<RiskFactor> {
    vec![
        RiskFactor::new("Exit Velocity Drop", MetricField::LaunchSpeed, 3.0),
        RiskFactor::new("Spin Rate Drop", MetricField::ReleaseSpinRate, 150.0),
        RiskFactor::new("Pitch Velocity Drop", MetricField::ReleaseSpeed, 2.0),
        RiskFactor::new("Arm Angle Changes", MetricField::ArmAngle, 5.0),
        RiskFactor::new("Sprint Speed Drop", MetricField::SprintSpeed, 0.5),
    ]
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    pub genai_api_url: String,
    /// Gemini API key (GENAI_API_KEY). Video analysis is unavailable without it.
    pub genai_api_key: Option<String>,
    pub genai_model: String,
    pub mlb_api_url: String,
    pub savant_api_url: String,
    pub statcast_start: NaiveDate,
    pub statcast_end: NaiveDate,
    pub analysis_max_attempts: u32,
    pub http_timeout_secs: u64,
    pub recent_sample_count: usize,
    pub risk_factors: Vec<RiskFactor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api_port: 3000,
            genai_api_url: GENAI_API_URL.to_string(),
            genai_api_key: None,
            genai_model: GENAI_MODEL.to_string(),
            mlb_api_url: MLB_API_URL.to_string(),
            savant_api_url: SAVANT_API_URL.to_string(),
            statcast_start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
            statcast_end: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default(),
            analysis_max_attempts: ANALYSIS_MAX_ATTEMPTS,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            recent_sample_count: RECENT_SAMPLE_COUNT,
            risk_factors: default_risk_factors(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let cfg = Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            api_port: parse_number_var("API_PORT", defaults.api_port)?,
            genai_api_url: std::env::var("GENAI_API_URL").unwrap_or(defaults.genai_api_url),
            genai_api_key: std::env::var("GENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            genai_model: std::env::var("GENAI_MODEL").unwrap_or(defaults.genai_model),
            mlb_api_url: std::env::var("MLB_API_URL").unwrap_or(defaults.mlb_api_url),
            savant_api_url: std::env::var("SAVANT_API_URL").unwrap_or(defaults.savant_api_url),
            statcast_start: parse_date_var("STATCAST_START_DATE", STATCAST_START_DATE)?,
            statcast_end: parse_date_var("STATCAST_END_DATE", STATCAST_END_DATE)?,
            analysis_max_attempts: parse_number_var("ANALYSIS_MAX_ATTEMPTS", ANALYSIS_MAX_ATTEMPTS)?
                .max(1),
            http_timeout_secs: parse_number_var("HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS)?,
            recent_sample_count: defaults.recent_sample_count,
            risk_factors: defaults.risk_factors,
        };

        if cfg.statcast_start > cfg.statcast_end {
            return Err(AppError::Config(format!(
                "STATCAST_START_DATE ({}) is after STATCAST_END_DATE ({})",
                cfg.statcast_start, cfg.statcast_end
            )));
        }
        Ok(cfg)
    }
}

/// Unset means `default`; set but unparsable is a config error.
fn parse_number_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

fn parse_date_var(key: &str, default: &str) -> Result<NaiveDate> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Config(format!("{key} must be a YYYY-MM-DD date, got {raw:?}")))
}
