use dashmap::DashMap;
use std::time::{Duration, Instant};

// Rate limit entry - tracks requests per client IP
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

// Fixed window counter per client, windows do not slide
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, client_id: &str) -> bool {
        self.check_at(client_id, Instant::now())
    }

    pub fn check_at(&self, client_id: &str, now: Instant) -> bool {
        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // window expired..? start a new one
        if now.saturating_duration_since(entry.window_start) > self.window {
            entry.count = 1;
            entry.window_start = now;
            return true;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            return true;
        }

        false
    }

    pub fn prune(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.window_start) <= self.window);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
