use crate::payload::WebhookPayload;
use crate::transport::WebhookTransport;
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;

/// [`WebhookTransport`] backed by a `reqwest` client.
///
/// The response status is logged but never turned into an error; only
/// failures to complete the request surface.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client, e.g. one built with a timeout or proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post(
        &self,
        endpoint: &str,
        payload: &WebhookPayload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let resp = self.client.post(endpoint).json(payload).send().await?;
        tracing::debug!(status = %resp.status(), "webhook responded");
        Ok(())
    }
}
