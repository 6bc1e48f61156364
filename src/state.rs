use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::notify::Notifier;
use crate::rate_limit::SubmissionRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub notifier: Notifier,
    pub submission_limiter: SubmissionRateLimiter,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, notifier: Notifier) -> SharedState {
        let submission_limiter = SubmissionRateLimiter::new(&config.rate_limit);
        Arc::new(Self {
            pool,
            config,
            notifier,
            submission_limiter,
        })
    }
}
