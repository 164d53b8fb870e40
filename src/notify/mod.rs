//! Fire-and-forget notification sink.
//!
//! Delivery is best-effort with no ordering guarantee; failures are logged
//! and never reach the caller.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{info, warn};

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, text: &str);
}

/// Posts `{"text": ...}` to a configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn notify(&self, text: &str) {
        let result = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await;

        match result {
            Ok(resp) if !resp.status().is_success() => {
                warn!(status = %resp.status(), "notification webhook rejected message");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "notification webhook send failed"),
        }
    }
}

/// Sink used when no webhook is configured; messages only hit the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, text: &str) {
        info!(notification = text);
    }
}

/// Test sink recording every message.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("recording sink poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, text: &str) {
        self.messages
            .lock()
            .expect("recording sink poisoned")
            .push(text.to_string());
    }
}
