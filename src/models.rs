use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Competitive region. `Global` and `All` double as "no region filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Americas,
    Emea,
    Apac,
    Global,
    All,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Americas,
        Region::Emea,
        Region::Apac,
        Region::Global,
        Region::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Americas => "americas",
            Region::Emea => "emea",
            Region::Apac => "apac",
            Region::Global => "global",
            Region::All => "all",
        }
    }

    // true for the sentinels that disable region filtering
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, Region::Global | Region::All)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coaching {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_coach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_coach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyst: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    pub role: String,
    pub country: String,
    pub join_date: String,
    #[serde(default)]
    pub captain: bool,
    #[serde(default)]
    pub substitute: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapScore {
    pub won: u32,
    pub lost: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

impl Default for Streak {
    fn default() -> Self {
        Self {
            kind: "none".to_string(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub win_rate: f64,
    pub map_win_rate: f64,
    pub average_rating: f64,
    pub average_map_score: MapScore,
    pub current_streak: Streak,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worst_map: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub placement: String,
    pub date: String,
    pub prize: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanStats {
    pub followers: u64,
    pub engagement: f64,
    pub merchandise: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextMatch {
    pub opponent: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub tag: String,
    pub logo: String,
    pub banner_image: String,
    pub country: String,
    pub region: Region,
    pub city: String,
    pub founded: String,
    pub ranking: u32,
    pub previous_rank: u32,
    pub rank_change: i32,
    pub peak_rank: u32,
    pub ranking_points: u32,
    pub verified: bool,
    pub status: String,
    pub organization: Organization,
    pub socials: Socials,
    pub roster: Vec<RosterPlayer>,
    pub coaching: Coaching,
    pub stats: TeamStats,
    pub achievements: Vec<Achievement>,
    pub sponsors: Vec<Sponsor>,
    pub fan_stats: FanStats,
    pub market_value: String,
    pub last_activity: DateTime<Utc>,
    pub next_match: Option<NextMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    pub wins: u32,
    pub losses: u32,
    pub streak: Streak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRankingStats {
    pub matches_played: u32,
    pub win_rate: f64,
    pub map_win_rate: f64,
    pub average_rating: f64,
    pub recent_performance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingAchievement {
    pub event: String,
    pub placement: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamHistoryPoint {
    pub date: String,
    pub rank: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRanking {
    pub id: u32,
    pub team_id: String,
    pub name: String,
    pub short_name: String,
    pub logo: String,
    pub rank: u32,
    pub previous_rank: u32,
    pub peak_rank: u32,
    pub points: u32,
    pub previous_points: u32,
    pub points_change: i32,
    pub region: Region,
    pub country: String,
    pub recent_results: Vec<String>,
    pub recent_form: RecentForm,
    pub change: i32,
    pub change_direction: ChangeDirection,
    pub last_update: DateTime<Utc>,
    pub stats: TeamRankingStats,
    pub achievements: Vec<RankingAchievement>,
    pub next_match: Option<NextMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_history: Option<Vec<TeamHistoryPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRankingStats {
    pub acs: u32,
    pub kd: f64,
    pub win_rate: f64,
    pub matches_played: u32,
    pub clutch_success: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHistoryPoint {
    pub date: String,
    pub rank: u32,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRanking {
    pub id: u32,
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub team_logo: String,
    pub rank: u32,
    pub previous_rank: u32,
    pub peak_rank: u32,
    pub rating: f64,
    pub previous_rating: f64,
    pub rating_change: f64,
    pub region: Region,
    pub country: String,
    pub role: String,
    pub stats: PlayerRankingStats,
    pub recent_form: f64,
    pub change: i32,
    pub change_direction: ChangeDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_history: Option<Vec<PlayerHistoryPoint>>,
}

// Reduced team payload for mobile clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactTeamStats {
    pub win_rate: f64,
    pub matches_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactTeam {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub tag: String,
    pub logo: String,
    pub country: String,
    pub region: Region,
    pub ranking: u32,
    pub rank_change: i32,
    pub ranking_points: u32,
    pub stats: CompactTeamStats,
    pub next_match: Option<NextMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactTeamRanking {
    pub id: u32,
    pub name: String,
    pub logo: String,
    pub rank: u32,
    pub change: i32,
    pub change_direction: ChangeDirection,
    pub points: u32,
    pub region: Region,
    pub recent_results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactPlayerRanking {
    pub id: u32,
    pub name: String,
    pub team: String,
    pub team_logo: String,
    pub rank: u32,
    pub change: i32,
    pub rating: f64,
    pub role: String,
}

// Either the full record or its mobile-shaped counterpart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View<Full, Compact> {
    Full(Full),
    Compact(Compact),
}

pub type TeamView = View<Team, CompactTeam>;
pub type TeamRankingView = View<TeamRanking, CompactTeamRanking>;
pub type PlayerRankingView = View<PlayerRanking, CompactPlayerRanking>;

// POST /api/teams body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub banner_image: Option<String>,
    pub city: Option<String>,
    pub founded: Option<String>,
    pub organization: Option<Organization>,
    pub socials: Option<Socials>,
    pub roster: Option<Vec<RosterPlayer>>,
    pub coaching: Option<Coaching>,
    pub sponsors: Option<Vec<Sponsor>>,
}

// POST /api/rankings body
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRankingsRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub updates: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_closed_set_only() {
        assert_eq!("emea".parse::<Region>(), Ok(Region::Emea));
        assert_eq!("all".parse::<Region>(), Ok(Region::All));
        assert!("EMEA".parse::<Region>().is_err());
        assert!("europe".parse::<Region>().is_err());
    }

    #[test]
    fn sentinels_disable_filtering() {
        assert!(Region::Global.is_unfiltered());
        assert!(Region::All.is_unfiltered());
        assert!(!Region::Apac.is_unfiltered());
    }

    #[test]
    fn view_serializes_without_variant_tag() {
        let view: View<u32, &str> = View::Compact("short");
        assert_eq!(serde_json::to_string(&view).unwrap(), "\"short\"");
    }
}
