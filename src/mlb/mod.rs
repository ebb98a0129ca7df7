pub mod statcast;
pub mod stats_api;

pub use statcast::SavantClient;
pub use stats_api::StatsApiClient;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::types::PlayerInfo;

/// The two public baseball data sources used for player analysis.
#[derive(Clone)]
pub struct MlbClients {
    pub stats: StatsApiClient,
    pub savant: SavantClient,
}

impl MlbClients {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            stats: StatsApiClient::new(cfg)?,
            savant: SavantClient::new(cfg)?,
        })
    }

    /// Canonical player record for a free-text name. `None` when either the
    /// Stats API or Savant has no match.
    pub async fn lookup_player(&self, name: &str) -> Result<Option<PlayerInfo>> {
        let Some(person) = self.stats.search_person(name).await? else {
            info!(query = name, "no MLB player matches");
            return Ok(None);
        };
        let Some(statcast_id) = self.savant.resolve_statcast_id(&person.full_name).await? else {
            info!(query = name, full_name = %person.full_name, "no Savant id for player");
            return Ok(None);
        };

        Ok(Some(PlayerInfo {
            id: person.id,
            name: person.full_name,
            position: person.primary_position.and_then(|p| p.abbreviation),
            statcast_id,
        }))
    }
}
