use serde::Serialize;
use std::str::FromStr;

use crate::models::{
    CompactPlayerRanking, CompactTeam, CompactTeamRanking, CompactTeamStats, PlayerRanking,
    PlayerRankingView, Team, TeamRanking, TeamRankingView, TeamView, View,
};

const MOBILE_UA_MARKERS: [&str; 4] = ["Mobile", "Android", "iPhone", "iPad"];
const COMPACT_RECENT_RESULTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Mobile,
    Desktop,
}

impl ClientKind {
    // explicit header wins over the user agent
    pub fn resolve(declared: Option<&str>, user_agent: Option<&str>) -> Self {
        declared
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| Self::from_user_agent(user_agent.unwrap_or("")))
    }

    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_UA_MARKERS.iter().any(|m| user_agent.contains(m)) {
            ClientKind::Mobile
        } else {
            ClientKind::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, ClientKind::Mobile)
    }
}

impl FromStr for ClientKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(ClientKind::Mobile),
            "desktop" => Ok(ClientKind::Desktop),
            _ => Err(()),
        }
    }
}

pub fn wants_compact(kind: ClientKind, include_stats: bool) -> bool {
    kind.is_mobile() && !include_stats
}

impl From<&Team> for CompactTeam {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            tag: team.tag.clone(),
            logo: team.logo.clone(),
            country: team.country.clone(),
            region: team.region,
            ranking: team.ranking,
            rank_change: team.rank_change,
            ranking_points: team.ranking_points,
            stats: CompactTeamStats {
                win_rate: team.stats.win_rate,
                matches_played: team.stats.matches_played,
            },
            next_match: team.next_match.clone(),
        }
    }
}

impl From<&TeamRanking> for CompactTeamRanking {
    fn from(ranking: &TeamRanking) -> Self {
        let name = if ranking.short_name.is_empty() {
            ranking.name.clone()
        } else {
            ranking.short_name.clone()
        };
        Self {
            id: ranking.id,
            name,
            logo: ranking.logo.clone(),
            rank: ranking.rank,
            change: ranking.change,
            change_direction: ranking.change_direction,
            points: ranking.points,
            region: ranking.region,
            recent_results: ranking
                .recent_results
                .iter()
                .take(COMPACT_RECENT_RESULTS)
                .cloned()
                .collect(),
        }
    }
}

impl From<&PlayerRanking> for CompactPlayerRanking {
    fn from(ranking: &PlayerRanking) -> Self {
        Self {
            id: ranking.id,
            name: ranking.name.clone(),
            team: ranking.team.clone(),
            team_logo: ranking.team_logo.clone(),
            rank: ranking.rank,
            change: ranking.change,
            rating: ranking.rating,
            role: ranking.role.clone(),
        }
    }
}

pub fn shape_teams(teams: &[Team], compact: bool) -> Vec<TeamView> {
    teams
        .iter()
        .map(|team| {
            if compact {
                View::Compact(CompactTeam::from(team))
            } else {
                View::Full(team.clone())
            }
        })
        .collect()
}

pub fn shape_team_rankings(
    rankings: &[TeamRanking],
    compact: bool,
    include_history: bool,
) -> Vec<TeamRankingView> {
    rankings
        .iter()
        .map(|ranking| {
            if compact {
                return View::Compact(CompactTeamRanking::from(ranking));
            }
            let mut full = ranking.clone();
            if !include_history {
                full.ranking_history = None;
            }
            View::Full(full)
        })
        .collect()
}

pub fn shape_player_rankings(
    rankings: &[PlayerRanking],
    compact: bool,
    include_history: bool,
) -> Vec<PlayerRankingView> {
    rankings
        .iter()
        .map(|ranking| {
            if compact {
                return View::Compact(CompactPlayerRanking::from(ranking));
            }
            let mut full = ranking.clone();
            if !include_history {
                full.ranking_history = None;
            }
            View::Full(full)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/124.0";

    #[test]
    fn user_agent_heuristic() {
        assert_eq!(ClientKind::from_user_agent(IPHONE_UA), ClientKind::Mobile);
        assert_eq!(ClientKind::from_user_agent("Dalvik/2.1.0 (Linux; U; Android 14)"), ClientKind::Mobile);
        assert_eq!(ClientKind::from_user_agent(DESKTOP_UA), ClientKind::Desktop);
        assert_eq!(ClientKind::from_user_agent(""), ClientKind::Desktop);
    }

    #[test]
    fn declared_kind_overrides_user_agent() {
        assert_eq!(ClientKind::resolve(Some("desktop"), Some(IPHONE_UA)), ClientKind::Desktop);
        assert_eq!(ClientKind::resolve(Some("Mobile"), Some(DESKTOP_UA)), ClientKind::Mobile);
        assert_eq!(ClientKind::resolve(Some("tablet"), Some(IPHONE_UA)), ClientKind::Mobile);
        assert_eq!(ClientKind::resolve(None, None), ClientKind::Desktop);
    }

    #[test]
    fn include_stats_keeps_full_records() {
        assert!(wants_compact(ClientKind::Mobile, false));
        assert!(!wants_compact(ClientKind::Mobile, true));
        assert!(!wants_compact(ClientKind::Desktop, false));
    }

    #[test]
    fn compact_team_drops_detail() {
        let teams = SeedData::bundled().unwrap().teams;
        let shaped = shape_teams(&teams[..1], true);
        let json = serde_json::to_value(&shaped[0]).unwrap();

        assert_eq!(json["name"], "Sentinels");
        assert_eq!(json["stats"]["matchesPlayed"], 32);
        assert!(json.get("roster").is_none());
        assert!(json["stats"].get("mapWinRate").is_none());
    }

    #[test]
    fn compact_team_ranking_uses_short_name_and_three_results() {
        let rankings = SeedData::bundled().unwrap().team_rankings;
        let compact = CompactTeamRanking::from(&rankings[1]);
        assert_eq!(compact.name, "FNC");
        assert_eq!(compact.recent_results, vec!["W", "W", "L"]);
    }

    #[test]
    fn history_is_stripped_unless_requested() {
        let players = SeedData::bundled().unwrap().player_rankings;

        let without = serde_json::to_value(shape_player_rankings(&players, false, false)).unwrap();
        assert!(without[0].get("rankingHistory").is_none());

        let with = serde_json::to_value(shape_player_rankings(&players, false, true)).unwrap();
        assert_eq!(with[0]["rankingHistory"].as_array().unwrap().len(), 4);
    }
}
