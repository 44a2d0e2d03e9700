use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{Filters, Meta, enforce_rate_limit, etag};
use crate::client::ClientContext;
use crate::error::ApiError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{
    PlayerRanking, PlayerRankingView, Region, TeamRanking, TeamRankingView, UpdateRankingsRequest,
};
use crate::pipeline::{Regional, filter_by_region};
use crate::query::{Period, RankingType, RankingsQuery};
use crate::shaping::{shape_player_rankings, shape_team_rankings, wants_compact};
use crate::state::{AppState, RankingSet};
use crate::stats::{RankingStats, ranking_stats};

const ROUTE: &str = "rankings";

#[derive(Serialize)]
#[serde(untagged)]
enum RankingsData {
    Teams {
        rankings: Vec<TeamRankingView>,
    },
    Players {
        rankings: Vec<PlayerRankingView>,
    },
    #[serde(rename_all = "camelCase")]
    Combined {
        team_rankings: Vec<TeamRankingView>,
        player_rankings: Vec<PlayerRankingView>,
    },
}

#[derive(Serialize)]
struct RankingsResponse {
    success: bool,
    #[serde(flatten)]
    data: RankingsData,
    filters: Filters<RankingsQuery>,
    stats: RankingStats,
    meta: Meta,
}

pub async fn list_rankings_handler(
    State(state): State<Arc<AppState>>,
    client: ClientContext,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();
    let _timer = REQUEST_LATENCY.with_label_values(&[ROUTE]).start_timer();

    enforce_rate_limit(&state.rankings_limiter, ROUTE, &client.ip)?;
    let query = RankingsQuery::from_params(&params)?;

    let lookup = {
        let teams = state.team_rankings.read().await;
        let players = state.player_rankings.read().await;
        state.rankings_cache.get_or_compute(&query.cache_key(), || {
            // seed data holds a single snapshot, so every period sees the same records
            Arc::new(RankingSet {
                teams: filter_by_region(&teams, query.region),
                players: filter_by_region(&players, query.region),
            })
        })
    };
    let set = &lookup.value;

    let limit = query.limit as usize;
    let teams = &set.teams[..limit.min(set.teams.len())];
    let players = &set.players[..limit.min(set.players.len())];
    let compact = wants_compact(client.kind, query.include_stats);

    let data = match query.kind {
        RankingType::Teams => RankingsData::Teams {
            rankings: shape_team_rankings(teams, compact, query.include_history),
        },
        RankingType::Players => RankingsData::Players {
            rankings: shape_player_rankings(players, compact, query.include_history),
        },
        RankingType::Combined => RankingsData::Combined {
            team_rankings: shape_team_rankings(teams, compact, query.include_history),
            player_rankings: shape_player_rankings(players, compact, query.include_history),
        },
    };

    let total_results = match query.kind {
        RankingType::Teams => set.teams.len(),
        RankingType::Players => set.players.len(),
        RankingType::Combined => set.teams.len() + set.players.len(),
    };

    let response = RankingsResponse {
        success: true,
        data,
        stats: ranking_stats(&set.teams, &set.players),
        filters: Filters {
            available: json!({
                "type": RankingType::VALUES,
                "region": ["americas", "emea", "apac", "global"],
                "period": Period::VALUES,
            }),
            applied: query,
        },
        meta: Meta {
            timestamp: Utc::now(),
            cached: lookup.hit,
            mobile: client.kind.is_mobile(),
            data_version: lookup.version.clone(),
            total_results: Some(total_results),
        },
    };

    Ok((etag(&lookup.version), Json(response)))
}

trait Identified {
    fn id(&self) -> u32;
}

impl Identified for TeamRanking {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Identified for PlayerRanking {
    fn id(&self) -> u32 {
        self.id
    }
}

pub async fn update_rankings_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.with_label_values(&["update_rankings"]).inc();

    let request: UpdateRankingsRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?;
    let (Some(kind), Some(updates)) = (request.kind, request.updates) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: type and updates".to_string(),
        ));
    };

    match kind.parse::<RankingType>() {
        Ok(RankingType::Teams) => {
            let mut rankings = state.team_rankings.write().await;
            let now = Utc::now();
            *rankings = apply_updates(&rankings, &updates, |r: &mut TeamRanking| r.last_update = now)?;
        }
        Ok(RankingType::Players) => {
            let mut rankings = state.player_rankings.write().await;
            *rankings = apply_updates(&rankings, &updates, |_: &mut PlayerRanking| {})?;
        }
        _ => {
            return Err(ApiError::BadRequest(format!(
                "Unsupported ranking type: {kind}"
            )));
        }
    }
    state.rankings_cache.invalidate_all();

    info!(kind = %kind, count = updates.len(), "rankings updated");

    Ok(Json(json!({
        "success": true,
        "message": format!("{kind} rankings updated successfully"),
        "updatedCount": updates.len(),
    })))
}

// Merges each partial update into the record with the same id. Unknown ids
// are skipped; any update that no longer fits the record rejects the batch.
fn apply_updates<T, F>(records: &[T], updates: &[Map<String, Value>], touch: F) -> Result<Vec<T>, ApiError>
where
    T: Identified + Regional + Serialize + DeserializeOwned + Clone,
    F: Fn(&mut T),
{
    let mut updated = records.to_vec();

    for update in updates {
        let Some(id) = update.get("id").and_then(Value::as_u64) else {
            return Err(ApiError::BadRequest("Each update needs a numeric id".to_string()));
        };
        let Some(record) = updated.iter_mut().find(|r| u64::from(r.id()) == id) else {
            continue;
        };

        let mut merged = match serde_json::to_value(&*record) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(ApiError::Internal("ranking did not serialize to an object".into())),
            Err(e) => return Err(ApiError::Internal(e.to_string())),
        };
        merged.extend(update.clone());

        let merged: T = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ApiError::BadRequest(format!("Invalid update for id {id}: {e}")))?;
        // "all" only makes sense as a filter, never on a stored record
        if merged.region() == Region::All {
            return Err(ApiError::BadRequest(format!("Invalid region for id {id}: all")));
        }
        *record = merged;
        touch(record);
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    fn update(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("update must be an object"),
        }
    }

    #[test]
    fn merges_partial_fields() {
        let seed = SeedData::bundled().unwrap();
        let updated = apply_updates(
            &seed.team_rankings,
            &[update(json!({"id": 4, "points": 1300, "changeDirection": "up"}))],
            |_| {},
        )
        .unwrap();

        let cloud9 = updated.iter().find(|r| r.id == 4).unwrap();
        assert_eq!(cloud9.points, 1300);
        assert_eq!(cloud9.name, "Cloud9");
        assert_eq!(updated.len(), 5);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let seed = SeedData::bundled().unwrap();
        let updated =
            apply_updates(&seed.player_rankings, &[update(json!({"id": 99, "rating": 2.0}))], |_| {})
                .unwrap();
        assert_eq!(updated, seed.player_rankings);
    }

    #[test]
    fn ill_typed_update_rejects_whole_batch() {
        let seed = SeedData::bundled().unwrap();
        let err = apply_updates(
            &seed.team_rankings,
            &[
                update(json!({"id": 1, "points": 10})),
                update(json!({"id": 2, "points": "lots"})),
            ],
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn filter_only_region_is_rejected() {
        let seed = SeedData::bundled().unwrap();
        let err = apply_updates(
            &seed.team_rankings,
            &[update(json!({"id": 1, "region": "all"}))],
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let moved = apply_updates(
            &seed.player_rankings,
            &[update(json!({"id": 1, "region": "global"}))],
            |_| {},
        )
        .unwrap();
        assert_eq!(moved[0].region, Region::Global);
    }

    #[test]
    fn touch_runs_on_matched_records() {
        let seed = SeedData::bundled().unwrap();
        let updated = apply_updates(
            &seed.player_rankings,
            &[update(json!({"id": 1}))],
            |r: &mut PlayerRanking| r.role = "flex".into(),
        )
        .unwrap();
        assert_eq!(updated[0].role, "flex");
        assert_eq!(updated[1].role, seed.player_rankings[1].role);
    }
}
