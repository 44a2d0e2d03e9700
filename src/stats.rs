use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{ChangeDirection, PlayerRanking, Region, Team, TeamRanking};

const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageTeamStats {
    pub win_rate: f64,
    pub ranking: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformers {
    pub highest_win_rate: Option<Team>,
    pub most_matches: Option<Team>,
    pub highest_rated: Option<Team>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDirectoryStats {
    pub total_teams: usize,
    pub average_stats: AverageTeamStats,
    pub region_distribution: BTreeMap<Region, usize>,
    pub top_performers: TopPerformers,
    pub recent_activity: Vec<Team>,
}

pub fn team_stats(teams: &[Team]) -> TeamDirectoryStats {
    let total = teams.len();
    let divisor = total.max(1) as f64;

    let win_rate: f64 = teams.iter().map(|t| t.stats.win_rate).sum();
    let ranking: f64 = teams.iter().map(|t| t.ranking as f64).sum();
    let points: f64 = teams.iter().map(|t| t.ranking_points as f64).sum();

    let mut recent: Vec<Team> = teams.to_vec();
    recent.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    recent.truncate(RECENT_ACTIVITY_LIMIT);

    TeamDirectoryStats {
        total_teams: total,
        average_stats: AverageTeamStats {
            win_rate: (win_rate / divisor * 100.0).round() / 100.0,
            ranking: (ranking / divisor).round() as u32,
            points: (points / divisor).round() as u32,
        },
        region_distribution: count_by(teams.iter().map(|t| t.region)),
        top_performers: TopPerformers {
            highest_win_rate: best_by(teams, |t| t.stats.win_rate),
            most_matches: best_by(teams, |t| t.stats.matches_played as f64),
            highest_rated: best_by(teams, |t| t.stats.average_rating),
        },
        recent_activity: recent,
    }
}

// first team holding the maximum wins ties
fn best_by(teams: &[Team], key: impl Fn(&Team) -> f64) -> Option<Team> {
    teams
        .iter()
        .fold(None::<&Team>, |best, team| match best {
            Some(b) if key(b) >= key(team) => Some(b),
            _ => Some(team),
        })
        .cloned()
}

fn count_by(regions: impl Iterator<Item = Region>) -> BTreeMap<Region, usize> {
    let mut counts = BTreeMap::new();
    for region in regions {
        *counts.entry(region).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Movements {
    pub up: usize,
    pub down: usize,
    pub stable: usize,
}

impl Movements {
    fn tally(directions: impl Iterator<Item = ChangeDirection>) -> Self {
        let mut movements = Self::default();
        for direction in directions {
            match direction {
                ChangeDirection::Up => movements.up += 1,
                ChangeDirection::Down => movements.down += 1,
                ChangeDirection::Stable => movements.stable += 1,
            }
        }
        movements
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionBreakdown {
    pub teams: BTreeMap<Region, usize>,
    pub players: BTreeMap<Region, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementSummary {
    pub team_movements: Movements,
    pub player_movements: Movements,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRankingStats {
    pub team_win_rate: f64,
    pub player_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingStats {
    pub total_teams: usize,
    pub total_players: usize,
    pub region_breakdown: RegionBreakdown,
    pub movements: MovementSummary,
    pub average_stats: AverageRankingStats,
}

pub fn ranking_stats(teams: &[TeamRanking], players: &[PlayerRanking]) -> RankingStats {
    RankingStats {
        total_teams: teams.len(),
        total_players: players.len(),
        region_breakdown: RegionBreakdown {
            teams: count_by(teams.iter().map(|t| t.region)),
            players: count_by(players.iter().map(|p| p.region)),
        },
        movements: MovementSummary {
            team_movements: Movements::tally(teams.iter().map(|t| t.change_direction)),
            player_movements: Movements::tally(players.iter().map(|p| p.change_direction)),
        },
        average_stats: AverageRankingStats {
            team_win_rate: mean(teams.iter().map(|t| t.stats.win_rate)),
            player_rating: mean(players.iter().map(|p| p.rating)),
        },
    }
}

// 0 for an empty input
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    #[test]
    fn team_stats_over_seed() {
        let teams = SeedData::bundled().unwrap().teams;
        let stats = team_stats(&teams);

        assert_eq!(stats.total_teams, 3);
        // (81.25 + 79.41 + 79.31) / 3
        assert_eq!(stats.average_stats.win_rate, 79.99);
        assert_eq!(stats.average_stats.ranking, 2);
        assert_eq!(stats.average_stats.points, 1212);
        assert_eq!(stats.region_distribution[&Region::Emea], 1);
        assert_eq!(
            stats.top_performers.most_matches.map(|t| t.name),
            Some("FNATIC".to_string())
        );
        assert_eq!(stats.recent_activity[0].name, "Gen.G");
    }

    #[test]
    fn empty_directory_does_not_divide_by_zero() {
        let stats = team_stats(&[]);
        assert_eq!(stats.total_teams, 0);
        assert_eq!(stats.average_stats.win_rate, 0.0);
        assert!(stats.top_performers.highest_rated.is_none());
    }

    #[test]
    fn ranking_movements_and_breakdown() {
        let seed = SeedData::bundled().unwrap();
        let stats = ranking_stats(&seed.team_rankings, &seed.player_rankings);

        assert_eq!(stats.total_teams, 5);
        assert_eq!(stats.region_breakdown.teams[&Region::Americas], 2);
        assert_eq!(
            stats.movements.team_movements,
            Movements { up: 3, down: 1, stable: 1 }
        );
        assert_eq!(
            stats.movements.player_movements,
            Movements { up: 2, down: 2, stable: 1 }
        );
    }

    #[test]
    fn ranking_averages_are_zero_when_empty() {
        let stats = ranking_stats(&[], &[]);
        assert_eq!(stats.average_stats.team_win_rate, 0.0);
        assert_eq!(stats.average_stats.player_rating, 0.0);
    }
}
