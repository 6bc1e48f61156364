use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::config::NotifyConfig;
use crate::email::{templates, Mailer};
use crate::models::Lead;

#[derive(Debug, Clone)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Fire-and-forget handle to the notification worker.
///
/// Sending only enqueues. Delivery happens on a background task that logs
/// and discards every failure, so nothing here can reach the response path.
#[derive(Clone)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Notification>>,
    destination: Option<String>,
}

impl Notifier {
    /// A notifier that drops everything. Used when no transport or no
    /// destination is configured.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            destination: None,
        }
    }

    /// Start the worker task. Without a mailer this is [`Notifier::disabled`]
    /// and no task is spawned.
    pub fn spawn(
        mailer: Option<Arc<dyn Mailer>>,
        config: &NotifyConfig,
    ) -> (Self, Option<JoinHandle<()>>) {
        let Some(mailer) = mailer else {
            return (Self::disabled(), None);
        };

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let handle = tokio::spawn(run(mailer, rx, config.timeout));

        (
            Self {
                tx: Some(tx),
                destination: config.to.clone(),
            },
            Some(handle),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a message for best-effort delivery. Never blocks and never fails.
    pub fn notify(&self, to: &str, subject: String, body: String) {
        let Some(tx) = &self.tx else {
            return;
        };

        let notification = Notification {
            to: to.to_string(),
            subject,
            body,
        };

        match tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                tracing::warn!("Notification queue full, dropping message to {}", n.to);
            }
            Err(TrySendError::Closed(n)) => {
                tracing::warn!("Notification worker stopped, dropping message to {}", n.to);
            }
        }
    }

    /// Tell the configured destination about a freshly stored lead.
    pub fn notify_lead(&self, lead: &Lead) {
        let Some(to) = &self.destination else {
            return;
        };
        self.notify(
            to,
            templates::lead_subject(lead),
            templates::render_lead_notification(lead),
        );
    }
}

async fn run(mailer: Arc<dyn Mailer>, mut rx: mpsc::Receiver<Notification>, timeout: Duration) {
    tracing::debug!("Notification worker started");

    while let Some(notification) = rx.recv().await {
        let to = notification.to.clone();
        let mailer = mailer.clone();

        // Each send runs in its own task so a panicking transport cannot take
        // the worker down with it.
        let mut send = tokio::spawn(async move {
            mailer
                .send(&notification.to, &notification.subject, &notification.body)
                .await
        });

        match tokio::time::timeout(timeout, &mut send).await {
            Ok(Ok(Ok(()))) => tracing::debug!("Notification sent to {to}"),
            Ok(Ok(Err(e))) => tracing::warn!("Notification to {to} failed: {e}"),
            Ok(Err(e)) => tracing::warn!("Notification task to {to} aborted: {e}"),
            Err(_) => {
                send.abort();
                tracing::warn!("Notification to {to} timed out after {timeout:?}");
            }
        }
    }

    tracing::debug!("Notification worker stopped");
}
