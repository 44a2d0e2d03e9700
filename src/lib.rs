pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod rate_limit;
pub mod routes;
pub mod seed;
pub mod shaping;
pub mod state;
pub mod stats;

pub use routes::router;
pub use state::AppState;
