use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{InjuryRecord, InjuryRow, SeasonStats, NOT_AVAILABLE};

/// A person returned by the MLB Stats API name search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub primary_position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PeopleResponse {
    #[serde(default)]
    people: Vec<Person>,
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct Transaction {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Client for `statsapi.mlb.com`.
#[derive(Clone)]
pub struct StatsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl StatsApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.mlb_api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("MLB Stats API {path} returned {status}")));
        }
        Ok(resp.json().await?)
    }

    /// First person matching a free-text name, if any.
    pub async fn search_person(&self, name: &str) -> Result<Option<Person>> {
        let v = self
            .get_json("/api/v1/people/search", &[("names", name), ("sportIds", "1")])
            .await?;
        let resp: PeopleResponse = serde_json::from_value(v)?;
        debug!(query = name, matches = resp.people.len(), "people search");
        Ok(resp.people.into_iter().next())
    }

    pub async fn season_stats(&self, person_id: u64) -> Result<SeasonStats> {
        let path = format!("/api/v1/people/{person_id}/stats");
        let v = self
            .get_json(&path, &[("stats", "season"), ("group", "hitting")])
            .await?;
        Ok(parse_season_stats(&v))
    }

    pub async fn injury_history(&self, person_id: u64) -> Result<Vec<InjuryRow>> {
        let id = person_id.to_string();
        let v = self
            .get_json("/api/v1/transactions", &[("playerId", id.as_str())])
            .await?;
        let resp: TransactionsResponse = serde_json::from_value(v)?;
        Ok(injury_rows(resp.transactions))
    }
}

/// First hitting split's avg / HR / RBI / OPS. Anything absent is "N/A".
pub fn parse_season_stats(v: &serde_json::Value) -> SeasonStats {
    let Some(stat) = v
        .get("stats")
        .and_then(|s| s.as_array())
        .and_then(|a| a.first())
        .and_then(|s| s.get("splits"))
        .and_then(|s| s.as_array())
        .and_then(|a| a.first())
        .and_then(|s| s.get("stat"))
    else {
        return SeasonStats::default();
    };

    SeasonStats {
        avg: stat_field(stat, "avg"),
        home_runs: stat_field(stat, "homeRuns"),
        rbi: stat_field(stat, "rbi"),
        ops: stat_field(stat, "ops"),
    }
}

fn stat_field(stat: &serde_json::Value, key: &str) -> String {
    match stat.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Keep injured-list transactions, relabelled for display, in source order.
fn injury_rows(transactions: Vec<Transaction>) -> Vec<InjuryRow> {
    transactions
        .into_iter()
        .filter_map(|t| {
            let description = t.description?;
            if !description.to_ascii_lowercase().contains("injured list") {
                return None;
            }
            Some(InjuryRow::from(InjuryRecord {
                description,
                date: t.date.unwrap_or_default(),
            }))
        })
        .collect()
}
