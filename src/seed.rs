use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{PlayerRanking, Team, TeamRanking};

const TEAMS_JSON: &str = include_str!("../data/teams.json");
const TEAM_RANKINGS_JSON: &str = include_str!("../data/team_rankings.json");
const PLAYER_RANKINGS_JSON: &str = include_str!("../data/player_rankings.json");

#[derive(Error, Debug)]
#[error("Failed to load {dataset} seed data: {source}")]
pub struct SeedError {
    pub dataset: &'static str,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub teams: Vec<Team>,
    pub team_rankings: Vec<TeamRanking>,
    pub player_rankings: Vec<PlayerRanking>,
}

impl SeedData {
    pub fn bundled() -> Result<Self, SeedError> {
        Ok(Self {
            teams: parse("teams", TEAMS_JSON)?,
            team_rankings: parse("team rankings", TEAM_RANKINGS_JSON)?,
            player_rankings: parse("player rankings", PLAYER_RANKINGS_JSON)?,
        })
    }
}

fn parse<T: DeserializeOwned>(dataset: &'static str, raw: &str) -> Result<Vec<T>, SeedError> {
    serde_json::from_str(raw).map_err(|source| SeedError { dataset, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    #[test]
    fn bundled_seed_loads() {
        let seed = SeedData::bundled().unwrap();
        assert_eq!(seed.teams.len(), 3);
        assert_eq!(seed.team_rankings.len(), 5);
        assert_eq!(seed.player_rankings.len(), 5);

        let sentinels = &seed.teams[0];
        assert_eq!(sentinels.name, "Sentinels");
        assert_eq!(sentinels.region, Region::Americas);
        assert_eq!(sentinels.roster.len(), 5);
        assert!(seed.team_rankings.iter().all(|t| t.ranking_history.is_some()));
    }

    #[test]
    fn malformed_seed_reports_dataset() {
        let err = parse::<Team>("teams", "[{").unwrap_err();
        assert_eq!(err.dataset, "teams");
        assert!(err.to_string().starts_with("Failed to load teams seed data"));
    }
}
