#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use leadbox::config::{AllowedOrigins, Config, NotifyConfig, RateLimitConfig};
use leadbox::email::Mailer;
use leadbox::notify::Notifier;
use leadbox::state::{AppState, SharedState};

/// A running test server instance with a dedicated SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub state: SharedState,
    pub client: Client,
    pub db_path: PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a lead as JSON, return (body, status).
    pub async fn submit_lead(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/lead"))
            .json(data)
            .send()
            .await
            .expect("submit lead failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a lead as form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/lead"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Read `GET /api/leads/count`.
    pub async fn lead_count(&self) -> i64 {
        let resp = self
            .client
            .get(self.url("/api/leads/count"))
            .send()
            .await
            .expect("count request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        body["count"].as_i64().unwrap()
    }
}

/// A lead that passes every validation rule.
pub fn valid_lead() -> Value {
    json!({
        "name": "Ada Lovelace",
        "company": "Analytical Engines Ltd",
        "role": "Head of Operations",
        "email": "ada@engines.example",
        "system": "SAP",
        "workflow": "We reconcile supplier invoices by hand every Friday."
    })
}

pub fn test_config(db_path: &PathBuf) -> Config {
    Config {
        database_url: format!("sqlite://{}", db_path.display()),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        allowed_origins: AllowedOrigins::Any,
        landing_page: PathBuf::from("does-not-exist/index.html"),
        max_body_size: 65_536,
        trusted_proxies: vec![],
        rate_limit: RateLimitConfig::default(),
        log_level: "warn".to_string(),
        smtp: None,
        notify: NotifyConfig {
            to: Some("sales@leadbox.test".to_string()),
            timeout: Duration::from_secs(2),
            queue_capacity: 16,
        },
    }
}

/// Spawn a test app with a fresh database and notifications disabled.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}, None).await
}

/// Spawn a test app, letting the caller tweak config and plug in a mailer.
pub async fn spawn_app_with(
    configure: impl FnOnce(&mut Config),
    mailer: Option<Arc<dyn Mailer>>,
) -> TestApp {
    let db_path = std::env::temp_dir().join(format!(
        "leadbox_test_{}.db",
        Uuid::now_v7().to_string().replace('-', "")
    ));

    let mut config = test_config(&db_path);
    configure(&mut config);

    let pool = leadbox::db::connect(&config.database_url)
        .await
        .expect("Failed to open test database");
    leadbox::db::migrate(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let (notifier, _task) = Notifier::spawn(mailer, &config.notify);
    let state = AppState::new(pool.clone(), config, notifier);
    let app = leadbox::build_app(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        state,
        client: Client::new(),
        db_path,
    }
}

/// Close the pool and remove the database files.
pub async fn cleanup(app: TestApp) {
    app.pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut path = app.db_path.clone().into_os_string();
        path.push(suffix);
        let _ = std::fs::remove_file(path);
    }
}

/// Mailer that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Mailer whose transport always fails.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), String> {
        Err("Failed to send email: connection refused".to_string())
    }
}

/// Mailer that never finishes.
pub struct HangingMailer;

#[async_trait]
impl Mailer for HangingMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), String> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Poll until `check` holds or the deadline passes.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
