mod health;
mod metrics;
mod rankings;
mod teams;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use rankings::{list_rankings_handler, update_rankings_handler};
pub use teams::{create_team_handler, get_team_handler, list_teams_handler};

use axum::http::{HeaderName, HeaderValue, header};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::metrics::RATE_LIMITED;
use crate::rate_limit::RateLimiter;

// Filters echoed back to the caller
#[derive(Serialize)]
pub struct Filters<Q: Serialize> {
    pub applied: Q,
    pub available: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub cached: bool,
    pub mobile: bool,
    pub data_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<usize>,
}

fn enforce_rate_limit(limiter: &RateLimiter, route: &str, ip: &str) -> Result<(), ApiError> {
    if limiter.check(ip) {
        return Ok(());
    }
    RATE_LIMITED.with_label_values(&[route]).inc();
    tracing::warn!(route, ip, limit = limiter.max_requests(), "rate limit exceeded");
    Err(ApiError::RateLimited)
}

fn etag(version: &str) -> [(HeaderName, HeaderValue); 1] {
    let value = HeaderValue::from_str(&format!("\"{version}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("\"unknown\""));
    [(header::ETAG, value)]
}
