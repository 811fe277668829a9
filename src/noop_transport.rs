use crate::payload::WebhookPayload;
use crate::transport::WebhookTransport;
use async_trait::async_trait;
use std::error::Error;

/// A transport that simply drops all payloads.
///
/// Useful for measuring the cost of payload assembly without any network
/// I/O, and for tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl WebhookTransport for NoopTransport {
    async fn post(
        &self,
        _endpoint: &str,
        _payload: &WebhookPayload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
