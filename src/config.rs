use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub landing_page: PathBuf,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit: RateLimitConfig,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Destination address. `None` turns notifications into a no-op.
    pub to: Option<String>,
    pub timeout: Duration,
    pub queue_capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            to: None,
            timeout: Duration::from_secs(10),
            queue_capacity: 64,
        }
    }
}

/// CORS origin policy.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            return AllowedOrigins::Any;
        }
        AllowedOrigins::List(
            raw.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// The value to send back as `Access-Control-Allow-Origin`, if any.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match self {
            AllowedOrigins::Any => Some(origin.unwrap_or("*").to_string()),
            AllowedOrigins::List(allowed) => origin
                .filter(|o| allowed.iter().any(|a| a == o))
                .map(|o| o.to_string()),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let env_nonempty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let database_url = env_or("DATABASE_URL", "sqlite://leads.db");

        let host: IpAddr = env_or("LEADBOX_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_HOST: {e}"))?;

        let port: u16 = env_or("LEADBOX_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_PORT: {e}"))?;

        let allowed_origins = AllowedOrigins::parse(&env_or("LEADBOX_ALLOWED_ORIGINS", "*"));
        let landing_page = PathBuf::from(env_or("LEADBOX_LANDING_PAGE", "index.html"));

        let max_body_size: usize = env_or("LEADBOX_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("LEADBOX_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid LEADBOX_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_requests: usize = env_or("LEADBOX_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_RATE_LIMIT: {e}"))?;
        let window_secs: u64 = env_or("LEADBOX_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let log_level = env_or("LEADBOX_LOG_LEVEL", "info");

        let smtp = match (
            env_nonempty("LEADBOX_SMTP_HOST"),
            env_nonempty("LEADBOX_SMTP_USER"),
            env_nonempty("LEADBOX_SMTP_PASS"),
        ) {
            (Some(host), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: env_or("LEADBOX_SMTP_PORT", "587")
                    .parse()
                    .map_err(|e| format!("Invalid LEADBOX_SMTP_PORT: {e}"))?,
                from: env_nonempty("LEADBOX_SMTP_FROM").unwrap_or_else(|| user.clone()),
                user,
                pass,
            }),
            _ => None,
        };

        let notify_timeout_secs: u64 = env_or("LEADBOX_NOTIFY_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_NOTIFY_TIMEOUT_SECS: {e}"))?;
        let queue_capacity: usize = env_or("LEADBOX_NOTIFY_QUEUE", "64")
            .parse()
            .map_err(|e| format!("Invalid LEADBOX_NOTIFY_QUEUE: {e}"))?;

        Ok(Config {
            database_url,
            host,
            port,
            allowed_origins,
            landing_page,
            max_body_size,
            trusted_proxies,
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            log_level,
            smtp,
            notify: NotifyConfig {
                to: env_nonempty("LEADBOX_NOTIFY_TO"),
                timeout: Duration::from_secs(notify_timeout_secs),
                queue_capacity: queue_capacity.max(1),
            },
        })
    }
}
