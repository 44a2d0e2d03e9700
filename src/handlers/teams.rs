use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{Filters, Meta, enforce_rate_limit, etag};
use crate::client::ClientContext;
use crate::error::ApiError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{
    CreateTeamRequest, FanStats, Region, Team, TeamStats, TeamView,
};
use crate::pipeline::{Pagination, paginate, select_teams};
use crate::query::{SortBy, SortOrder, TeamsQuery};
use crate::shaping::{shape_teams, wants_compact};
use crate::state::AppState;
use crate::stats::{TeamDirectoryStats, team_stats};

const ROUTE: &str = "teams";
const REQUIRED_FIELDS: [&str; 4] = ["name", "tag", "region", "country"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamsResponse {
    success: bool,
    data: Vec<TeamView>,
    pagination: Pagination,
    filters: Filters<TeamsQuery>,
    stats: TeamDirectoryStats,
    meta: Meta,
}

pub async fn list_teams_handler(
    State(state): State<Arc<AppState>>,
    client: ClientContext,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();
    let _timer = REQUEST_LATENCY.with_label_values(&[ROUTE]).start_timer();

    enforce_rate_limit(&state.teams_limiter, ROUTE, &client.ip)?;
    let query = TeamsQuery::from_params(&params)?;

    let (lookup, stats) = {
        let teams = state.teams.read().await;
        let lookup = state
            .teams_cache
            .get_or_compute(&query.cache_key(), || Arc::new(select_teams(&teams, &query)));
        (lookup, team_stats(&teams))
    };

    let page = paginate(&lookup.value, query.page, query.limit);
    let compact = wants_compact(client.kind, query.include_stats);

    let response = TeamsResponse {
        success: true,
        data: shape_teams(&page.items, compact),
        pagination: page.pagination,
        filters: Filters {
            available: json!({
                "region": ["americas", "emea", "apac", "global"],
                "sortBy": SortBy::VALUES,
                "sortOrder": SortOrder::VALUES,
            }),
            applied: query,
        },
        stats,
        meta: Meta {
            timestamp: Utc::now(),
            cached: lookup.hit,
            mobile: client.kind.is_mobile(),
            data_version: lookup.version.clone(),
            total_results: None,
        },
    };

    Ok((etag(&lookup.version), Json(response)))
}

pub async fn create_team_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.with_label_values(&["create_team"]).inc();

    let request: CreateTeamRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?;

    let fields = [&request.name, &request.tag, &request.region, &request.country];
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .zip(fields)
        .find(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
    {
        return Err(ApiError::BadRequest(format!("Missing required field: {missing}")));
    }

    let region_raw = request.region.clone().unwrap_or_default();
    let region = match region_raw.parse::<Region>() {
        Ok(Region::All) | Err(_) => {
            return Err(ApiError::BadRequest(format!("Invalid region: {region_raw}")));
        }
        Ok(region) => region,
    };

    let team = {
        let mut teams = state.teams.write().await;
        let team = new_team(request, region, teams.len() as u32 + 1);
        teams.push(team.clone());
        team
    };
    state.teams_cache.invalidate_all();

    info!(id = %team.id, name = %team.name, "new team created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Team created successfully",
            "team": team,
        })),
    ))
}

// New teams start at the bottom of the table with empty records
fn new_team(request: CreateTeamRequest, region: Region, position: u32) -> Team {
    let now = Utc::now();
    let name = request.name.unwrap_or_default();
    let tag = request.tag.unwrap_or_default().to_uppercase();

    Team {
        id: position.to_string(),
        short_name: request.short_name.unwrap_or_else(|| name.clone()),
        name,
        tag,
        logo: request
            .logo
            .unwrap_or_else(|| "/teams/default-logo.png".to_string()),
        banner_image: request
            .banner_image
            .unwrap_or_else(|| "/teams/default-banner.jpg".to_string()),
        country: request.country.unwrap_or_default(),
        region,
        city: request.city.unwrap_or_default(),
        founded: request
            .founded
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        ranking: position,
        previous_rank: position,
        rank_change: 0,
        peak_rank: position,
        ranking_points: 0,
        verified: false,
        status: "active".to_string(),
        organization: request.organization.unwrap_or_default(),
        socials: request.socials.unwrap_or_default(),
        roster: request.roster.unwrap_or_default(),
        coaching: request.coaching.unwrap_or_default(),
        stats: TeamStats::default(),
        achievements: Vec::new(),
        sponsors: request.sponsors.unwrap_or_default(),
        fan_stats: FanStats {
            followers: 0,
            engagement: 0.0,
            merchandise: "unavailable".to_string(),
        },
        market_value: "low".to_string(),
        last_activity: now,
        next_match: None,
    }
}

pub async fn get_team_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.with_label_values(&["team_detail"]).inc();

    let teams = state.teams.read().await;
    let team = teams
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let body = match params.get("player") {
        Some(player_id) => {
            let player = team
                .roster
                .iter()
                .find(|p| &p.id == player_id)
                .ok_or_else(|| ApiError::NotFound("Player not found in this team".to_string()))?;
            serde_json::to_value(player)
        }
        None => serde_json::to_value(team),
    }
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(body))
}
