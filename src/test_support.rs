use crate::payload::WebhookPayload;
use crate::transport::WebhookTransport;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;

/// Keeps every posted payload in memory.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    sent: Mutex<Vec<(String, WebhookPayload)>>,
}

impl RecordingTransport {
    pub(crate) fn sent(&self) -> Vec<(String, WebhookPayload)> {
        self.sent.lock().unwrap().clone()
    }

    /// Poll until `count` payloads arrived or roughly a second passed.
    pub(crate) async fn wait_for(&self, count: usize) -> Vec<(String, WebhookPayload)> {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post(
        &self,
        endpoint: &str,
        payload: &WebhookPayload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sent
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload.clone()));
        Ok(())
    }
}

pub(crate) struct FailingTransport;

#[async_trait]
impl WebhookTransport for FailingTransport {
    async fn post(
        &self,
        _endpoint: &str,
        _payload: &WebhookPayload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err("connection refused".into())
    }
}
