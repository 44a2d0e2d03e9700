use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::handlers::{
    create_team_handler, get_team_handler, health_handler, list_rankings_handler,
    list_teams_handler, metrics_handler, update_rankings_handler,
};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/teams", get(list_teams_handler).post(create_team_handler))
        .route("/api/teams/{id}", get(get_team_handler))
        .route(
            "/api/rankings",
            get(list_rankings_handler).post(update_rankings_handler),
        )
        .with_state(state)
}
