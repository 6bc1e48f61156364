use std::collections::VecDeque;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Per-IP submission rate limiter over a trailing window.
///
/// Each address keeps the instants of its recent admissions (a sliding log),
/// so at most `max_requests` are admitted in any window. The window edge is
/// inclusive: an admission exactly `window` old still counts.
pub struct SubmissionRateLimiter {
    /// ip -> admission instants inside the window, oldest first
    entries: DashMap<IpAddr, VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl SubmissionRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests: config.max_requests,
            window: config.window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request from `ip` at `now`. When rejected, returns
    /// the whole number of seconds after which a retry is admitted.
    ///
    /// Eviction, the limit check and the append happen while holding the
    /// entry's shard lock, so concurrent requests from one address cannot
    /// overshoot the limit.
    pub fn admit(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let mut bucket = self.entries.entry(ip).or_default();

        while let Some(&oldest) = bucket.front() {
            if now.saturating_duration_since(oldest) > self.window {
                bucket.pop_front();
            } else {
                break;
            }
        }

        if bucket.len() >= self.max_requests {
            let retry_after = bucket
                .front()
                .map(|&oldest| {
                    // The oldest entry stops counting once its age exceeds the
                    // window, so round down and add one second.
                    self.window
                        .saturating_sub(now.saturating_duration_since(oldest))
                        .as_secs()
                        + 1
                })
                .unwrap_or(self.window.as_secs() + 1);
            return Err(retry_after);
        }

        bucket.push_back(now);
        Ok(())
    }

    /// Drop buckets whose newest admission has left the window.
    pub fn cleanup(&self, now: Instant) {
        self.entries.retain(|_, bucket| {
            bucket
                .back()
                .is_some_and(|&newest| now.saturating_duration_since(newest) <= self.window)
        });
    }

    pub fn tracked_addresses(&self) -> usize {
        self.entries.len()
    }
}
