use std::net::IpAddr;
use std::time::{Duration, Instant};

use leadbox::config::RateLimitConfig;
use leadbox::rate_limit::SubmissionRateLimiter;

fn limiter() -> SubmissionRateLimiter {
    SubmissionRateLimiter::new(&RateLimitConfig::default())
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn eleventh_request_in_window_rejected() {
    let limiter = limiter();
    let start = Instant::now();

    for i in 0..10 {
        assert!(limiter.admit(ip("192.0.2.1"), start + Duration::from_secs(i)).is_ok());
    }

    let now = start + Duration::from_secs(10);
    let retry_after = limiter.admit(ip("192.0.2.1"), now).unwrap_err();
    // Oldest entry was at +0s and still counts at exactly +60s.
    assert_eq!(retry_after, 51);
    assert!(limiter.admit(ip("192.0.2.1"), now + Duration::from_secs(retry_after)).is_ok());
}

#[test]
fn waiting_retry_after_is_enough() {
    for offset_ms in [10_000, 10_500, 59_999, 60_000] {
        let limiter = limiter();
        let start = Instant::now();
        for _ in 0..10 {
            limiter.admit(ip("192.0.2.1"), start).unwrap();
        }

        let now = start + Duration::from_millis(offset_ms);
        let retry_after = limiter.admit(ip("192.0.2.1"), now).unwrap_err();
        assert!(retry_after >= 1);

        let retry_at = now + Duration::from_secs(retry_after);
        assert!(
            limiter.admit(ip("192.0.2.1"), retry_at).is_ok(),
            "retry after {retry_after}s at +{offset_ms}ms still rejected"
        );
    }
}

#[test]
fn requests_spread_beyond_window_all_admitted() {
    let limiter = limiter();
    let start = Instant::now();

    for i in 0..11 {
        let now = start + Duration::from_secs(61 * i);
        assert!(limiter.admit(ip("192.0.2.1"), now).is_ok(), "request {i} rejected");
    }
}

#[test]
fn slot_frees_once_oldest_leaves_window() {
    let limiter = limiter();
    let start = Instant::now();

    for _ in 0..10 {
        limiter.admit(ip("192.0.2.1"), start).unwrap();
    }
    // Entries exactly one window old still count.
    assert!(limiter.admit(ip("192.0.2.1"), start + Duration::from_secs(60)).is_err());
    assert!(limiter
        .admit(ip("192.0.2.1"), start + Duration::from_millis(60_001))
        .is_ok());
}

#[test]
fn rejected_requests_are_not_recorded() {
    let limiter = limiter();
    let start = Instant::now();

    for _ in 0..10 {
        limiter.admit(ip("192.0.2.1"), start).unwrap();
    }
    for s in 1..30 {
        assert!(limiter
            .admit(ip("192.0.2.1"), start + Duration::from_secs(s))
            .is_err());
    }
    // Only the original ten are in the bucket, so they all expire together.
    for _ in 0..10 {
        assert!(limiter
            .admit(ip("192.0.2.1"), start + Duration::from_secs(61))
            .is_ok());
    }
}

#[test]
fn addresses_are_independent() {
    let limiter = limiter();
    let now = Instant::now();

    for _ in 0..10 {
        limiter.admit(ip("192.0.2.1"), now).unwrap();
    }
    assert!(limiter.admit(ip("192.0.2.1"), now).is_err());
    assert!(limiter.admit(ip("2001:db8::1"), now).is_ok());
}

#[test]
fn cleanup_drops_idle_buckets() {
    let limiter = limiter();
    let start = Instant::now();

    limiter.admit(ip("192.0.2.1"), start).unwrap();
    limiter.admit(ip("192.0.2.2"), start + Duration::from_secs(30)).unwrap();
    assert_eq!(limiter.tracked_addresses(), 2);

    limiter.cleanup(start + Duration::from_secs(61));
    assert_eq!(limiter.tracked_addresses(), 1);

    limiter.cleanup(start + Duration::from_secs(120));
    assert_eq!(limiter.tracked_addresses(), 0);
}

#[test]
fn concurrent_burst_never_exceeds_limit() {
    let limiter = std::sync::Arc::new(limiter());
    let now = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let limiter = limiter.clone();
            std::thread::spawn(move || {
                (0..10)
                    .filter(|_| limiter.admit(ip("192.0.2.1"), now).is_ok())
                    .count()
            })
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 10);
}
