use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, GaugeVec, HistogramVec, register_counter, register_counter_vec,
    register_gauge_vec, register_histogram_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: CounterVec = register_counter_vec!(
        "esports_api_requests_total",
        "Total number of requests",
        &["route"]
    )
    .unwrap();
    pub static ref RATE_LIMITED: CounterVec = register_counter_vec!(
        "esports_api_rate_limited_total",
        "Requests rejected by the rate limiter",
        &["route"]
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("esports_api_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("esports_api_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        "esports_api_request_latency_seconds",
        "Request latency in seconds",
        &["route"]
    )
    .unwrap();
    pub static ref CACHE_SIZE: GaugeVec = register_gauge_vec!(
        "esports_api_cache_size",
        "Current number of items in cache",
        &["cache"]
    )
    .unwrap();
}
