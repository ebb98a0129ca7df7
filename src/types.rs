use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Statcast samples
// ---------------------------------------------------------------------------

/// One dated row of a player's Statcast metrics. Any metric may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub game_date: NaiveDate,
    pub release_speed: Option<f64>,
    pub launch_speed: Option<f64>,
    pub release_spin_rate: Option<f64>,
    pub arm_angle: Option<f64>,
    pub sprint_speed: Option<f64>,
}

impl PerformanceSample {
    pub fn value(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::ReleaseSpeed => self.release_speed,
            MetricField::LaunchSpeed => self.launch_speed,
            MetricField::ReleaseSpinRate => self.release_spin_rate,
            MetricField::ArmAngle => self.arm_angle,
            MetricField::SprintSpeed => self.sprint_speed,
        }
    }
}

/// Statcast columns tracked by the risk detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    /// Pitch velocity (mph).
    ReleaseSpeed,
    /// Exit velocity (mph).
    LaunchSpeed,
    /// Spin rate (rpm).
    ReleaseSpinRate,
    /// Arm angle (degrees).
    ArmAngle,
    /// Sprint speed (ft/s).
    SprintSpeed,
}

impl MetricField {
    pub fn column(self) -> &'static str {
        match self {
            MetricField::ReleaseSpeed => "release_speed",
            MetricField::LaunchSpeed => "launch_speed",
            MetricField::ReleaseSpinRate => "release_spin_rate",
            MetricField::ArmAngle => "arm_angle",
            MetricField::SprintSpeed => "sprint_speed",
        }
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

// ---------------------------------------------------------------------------
// Risk factors and findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub field: MetricField,
    /// Absolute deviation that triggers a finding.
    pub threshold: f64,
}

impl RiskFactor {
    pub fn new(name: &str, field: MetricField, threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            field,
            threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Moderate,
}

impl RiskLevel {
    /// Drops are High; rises past the threshold are Moderate.
    pub fn from_change(change: f64) -> Self {
        if change < 0.0 {
            RiskLevel::High
        } else {
            RiskLevel::Moderate
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Moderate => write!(f, "Moderate"),
        }
    }
}

/// Serialized with the column labels the dashboard table shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    #[serde(rename = "Metric")]
    pub metric: String,
    /// Signed change, two decimals.
    #[serde(rename = "Change")]
    pub change: String,
    #[serde(rename = "Risk Level")]
    pub level: RiskLevel,
}

// ---------------------------------------------------------------------------
// Model output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnalysis {
    /// The response carried the requested table; holds the full raw text.
    MetricsFound { analysis: String },
    NoMetrics,
}

impl ParsedAnalysis {
    pub fn metrics_found(&self) -> bool {
        matches!(self, ParsedAnalysis::MetricsFound { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Chinese,
    Japanese,
    Hindi,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Hindi => "Hindi",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// MLB Stats API person id.
    pub id: u64,
    pub name: String,
    pub position: Option<String>,
    /// Baseball Savant id used for the Statcast export.
    pub statcast_id: u64,
}

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub avg: String,
    pub home_runs: String,
    pub rbi: String,
    pub ops: String,
}

impl Default for SeasonStats {
    fn default() -> Self {
        Self {
            avg: NOT_AVAILABLE.to_string(),
            home_runs: NOT_AVAILABLE.to_string(),
            rbi: NOT_AVAILABLE.to_string(),
            ops: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Injury entry as the upstream source returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InjuryRecord {
    pub description: String,
    pub date: String,
}

/// Injury entry as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjuryRow {
    #[serde(rename = "Injury")]
    pub injury: String,
    #[serde(rename = "Date")]
    pub date: String,
}

impl From<InjuryRecord> for InjuryRow {
    fn from(r: InjuryRecord) -> Self {
        Self {
            injury: r.description,
            date: r.date,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports returned by the API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: PlayerInfo,
    pub season: SeasonStats,
    pub sample_count: usize,
    pub findings: Vec<RiskFinding>,
    pub injuries: Vec<InjuryRow>,
    /// Informational notes for empty sections.
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayerOutcome {
    Found(PlayerReport),
    NotFound { query: String, message: String },
    /// Lookup or fetch failed for this player only.
    Unavailable { query: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub video_url: String,
    pub metrics_found: bool,
    pub analysis: Option<String>,
    pub language: Language,
    pub message: Option<String>,
    pub players: Vec<PlayerOutcome>,
}
