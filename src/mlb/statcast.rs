use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::PerformanceSample;

/// One row of the Baseball Savant search export. Only the tracked columns
/// are read; columns a given export lacks deserialize as `None`.
#[derive(Debug, Deserialize)]
struct SavantRow {
    game_date: NaiveDate,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    release_speed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    launch_speed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    release_spin_rate: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    arm_angle: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    sprint_speed: Option<f64>,
}

impl From<SavantRow> for PerformanceSample {
    fn from(r: SavantRow) -> Self {
        Self {
            game_date: r.game_date,
            release_speed: r.release_speed,
            launch_speed: r.launch_speed,
            release_spin_rate: r.release_spin_rate,
            arm_angle: r.arm_angle,
            sprint_speed: r.sprint_speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SavantPlayer {
    id: serde_json::Value,
    name: String,
}

/// Client for `baseballsavant.mlb.com`.
#[derive(Clone)]
pub struct SavantClient {
    http: reqwest::Client,
    base_url: String,
}

impl SavantClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.savant_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the Savant id for a canonical "First ... Last" name by
    /// searching on the last name and matching first and last exactly.
    pub async fn resolve_statcast_id(&self, full_name: &str) -> Result<Option<u64>> {
        let Some((first, last)) = first_and_last(full_name) else {
            return Ok(None);
        };
        let url = format!("{}/player/search-all", self.base_url);
        let resp = self.http.get(&url).query(&[("search", last)]).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("Savant player search returned {status}")));
        }
        let players: Vec<SavantPlayer> = resp.json().await?;
        Ok(match_player_id(&players, first, last))
    }

    /// Pitch-level Statcast rows for a batter between `start` and `end`.
    /// Rows come back in Savant's order; see [`sort_recent_first`].
    pub async fn fetch_samples(
        &self,
        statcast_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PerformanceSample>> {
        let url = format!("{}/statcast_search/csv", self.base_url);
        let id = statcast_id.to_string();
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("all", "true"),
                ("player_type", "batter"),
                ("batters_lookup[]", id.as_str()),
                ("game_date_gt", start.as_str()),
                ("game_date_lt", end.as_str()),
                ("type", "details"),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("Savant statcast export returned {status}")));
        }
        let body = resp.text().await?;
        let samples = parse_statcast_csv(&body)?;
        debug!(statcast_id, rows = samples.len(), "statcast export parsed");
        Ok(samples)
    }
}

pub fn parse_statcast_csv(body: &str) -> Result<Vec<PerformanceSample>> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut samples = Vec::new();
    for row in reader.deserialize::<SavantRow>() {
        samples.push(row?.into());
    }
    Ok(samples)
}

/// Newest game first. Stable, so rows of the same game keep export order.
pub fn sort_recent_first(samples: &mut [PerformanceSample]) {
    samples.sort_by(|a, b| b.game_date.cmp(&a.game_date));
}

fn first_and_last(full_name: &str) -> Option<(&str, &str)> {
    let mut parts = full_name.split_whitespace();
    let first = parts.next()?;
    let last = parts.last().unwrap_or(first);
    Some((first, last))
}

/// Savant lists names either as "Last, First" or "First Last".
fn match_player_id(players: &[SavantPlayer], first: &str, last: &str) -> Option<u64> {
    players
        .iter()
        .find(|p| {
            let (p_first, p_last) = match p.name.split_once(',') {
                Some((l, f)) => (f.trim(), l.trim()),
                None => match first_and_last(&p.name) {
                    Some(pair) => pair,
                    None => return false,
                },
            };
            p_first.eq_ignore_ascii_case(first) && p_last.eq_ignore_ascii_case(last)
        })
        .and_then(|p| match &p.id {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        })
}
