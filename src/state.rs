use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::Args;
use crate::models::{PlayerRanking, Team, TeamRanking};
use crate::rate_limit::RateLimiter;
use crate::seed::{SeedData, SeedError};

// Region-filtered ranking lists held in the rankings cache
#[derive(Debug, Clone, serde::Serialize)]
pub struct RankingSet {
    pub teams: Vec<TeamRanking>,
    pub players: Vec<PlayerRanking>,
}

// app's shared state
pub struct AppState {
    pub teams: RwLock<Vec<Team>>,
    pub team_rankings: RwLock<Vec<TeamRanking>>,
    pub player_rankings: RwLock<Vec<PlayerRanking>>,
    pub teams_cache: TtlCache<Arc<Vec<Team>>>,
    pub rankings_cache: TtlCache<Arc<RankingSet>>,
    pub teams_limiter: RateLimiter,
    pub rankings_limiter: RateLimiter,
}

impl AppState {
    pub fn new(args: &Args) -> Result<Arc<Self>, SeedError> {
        Ok(Self::with_seed(args, SeedData::bundled()?))
    }

    pub fn with_seed(args: &Args, seed: SeedData) -> Arc<Self> {
        Arc::new(Self {
            teams: RwLock::new(seed.teams),
            team_rankings: RwLock::new(seed.team_rankings),
            player_rankings: RwLock::new(seed.player_rankings),
            teams_cache: TtlCache::new("teams", args.cache_ttl()),
            rankings_cache: TtlCache::new("rankings", args.cache_ttl()),
            teams_limiter: RateLimiter::new(args.teams_rate_limit, args.rate_window()),
            rankings_limiter: RateLimiter::new(args.rankings_rate_limit, args.rate_window()),
        })
    }

    pub fn sweep_expired(&self, now: Instant) {
        let clients = self.teams_limiter.prune(now) + self.rankings_limiter.prune(now);
        let entries = self.teams_cache.prune(now) + self.rankings_cache.prune(now);
        if clients > 0 || entries > 0 {
            debug!(clients, entries, "pruned expired rate limit windows and cache entries");
        }
    }
}

// Sweeps expired rate limit windows and cache entries so idle keys don't pile up
pub async fn expiry_sweeper(state: Arc<AppState>, every: Duration) {
    let mut interval = interval(every);

    debug!("Expiry sweeper started (interval: {:?})", every);

    loop {
        interval.tick().await;

        state.sweep_expired(Instant::now());
    }
}
