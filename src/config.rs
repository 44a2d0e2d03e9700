use clap::Parser;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CACHE_TTL: u64 = 300;
pub const DEFAULT_TEAMS_RATE_LIMIT: u32 = 80;
pub const DEFAULT_RANKINGS_RATE_LIMIT: u32 = 60;
pub const DEFAULT_RATE_WINDOW: u64 = 60;
pub const DEFAULT_PRUNE_INTERVAL: u64 = 60;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "esports-stats-api")]
#[command(about = "Teams and rankings API for the esports stats platform")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = DEFAULT_CACHE_TTL)]
    pub cache_ttl: u64,

    // Max GET /api/teams requests per client per window
    #[arg(long, default_value_t = DEFAULT_TEAMS_RATE_LIMIT)]
    pub teams_rate_limit: u32,

    // Max GET /api/rankings requests per client per window
    #[arg(long, default_value_t = DEFAULT_RANKINGS_RATE_LIMIT)]
    pub rankings_rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = DEFAULT_RATE_WINDOW)]
    pub rate_window: u64,

    // How often stale rate limit entries are swept, in seconds
    #[arg(long, default_value_t = DEFAULT_PRUNE_INTERVAL)]
    pub prune_interval: u64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_ttl: DEFAULT_CACHE_TTL,
            teams_rate_limit: DEFAULT_TEAMS_RATE_LIMIT,
            rankings_rate_limit: DEFAULT_RANKINGS_RATE_LIMIT,
            rate_window: DEFAULT_RATE_WINDOW,
            prune_interval: DEFAULT_PRUNE_INTERVAL,
        }
    }
}

impl Args {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_default_impl() {
        let parsed = Args::parse_from(["esports-stats-api"]);
        let default = Args::default();
        assert_eq!(parsed.port, default.port);
        assert_eq!(parsed.cache_ttl, default.cache_ttl);
        assert_eq!(parsed.teams_rate_limit, 80);
        assert_eq!(parsed.rankings_rate_limit, 60);
        assert_eq!(parsed.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "esports-stats-api",
            "--port",
            "9000",
            "--teams-rate-limit",
            "5",
            "--rate-window",
            "10",
        ]);
        assert_eq!(args.port, 9000);
        assert_eq!(args.teams_rate_limit, 5);
        assert_eq!(args.rate_window(), Duration::from_secs(10));
    }
}
