use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::signal;
use tracing_subscriber::EnvFilter;

use leadbox::config::Config;
use leadbox::email::{Mailer, SmtpMailer};
use leadbox::notify::Notifier;
use leadbox::state::{AppState, SharedState};

const NOTIFY_DRAIN_GRACE: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting leadbox");

    let pool = leadbox::db::connect(&config.database_url).await?;
    leadbox::db::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let mailer: Option<Arc<dyn Mailer>> = match (&config.smtp, &config.notify.to) {
        (Some(smtp), Some(_)) => match SmtpMailer::new(smtp) {
            Ok(mailer) => {
                tracing::info!("SMTP configured, lead notifications enabled");
                Some(Arc::new(mailer))
            }
            Err(e) => {
                tracing::warn!("SMTP not available, lead notifications disabled: {e}");
                None
            }
        },
        _ => {
            tracing::info!("Lead notifications not configured");
            None
        }
    };
    let (notifier, notify_task) = Notifier::spawn(mailer, &config.notify);

    let addr = SocketAddr::new(config.host, config.port);
    let state = AppState::new(pool.clone(), config, notifier);
    let sweeper = tokio::spawn(sweep_rate_limits(state.clone()));
    let app = leadbox::build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The sweeper holds the last state handle; once it is gone the notifier
    // queue closes and the worker drains what is left.
    sweeper.abort();
    let _ = sweeper.await;

    if let Some(task) = notify_task {
        if tokio::time::timeout(NOTIFY_DRAIN_GRACE, task).await.is_err() {
            tracing::warn!("Pending notifications dropped at shutdown");
        }
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Drop idle rate-limit buckets once per window.
async fn sweep_rate_limits(state: SharedState) {
    let period = state.submission_limiter.window().max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        state.submission_limiter.cleanup(Instant::now());
        tracing::trace!(
            "Rate limiter tracking {} addresses",
            state.submission_limiter.tracked_addresses()
        );
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
