use crate::payload::WebhookPayload;
use async_trait::async_trait;
use std::error::Error;

/// Asynchronous delivery of a [`WebhookPayload`] to a webhook endpoint.
///
/// Implementations own the HTTP (or fake) client. The notifier calls `post`
/// once per log call, usually from a spawned task, and hands whatever error
/// comes back to the caller through the pending result.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST a single payload as JSON.
    ///
    /// **Parameters**
    /// - `endpoint`: webhook URL exactly as configured, never validated.
    /// - `payload`: fully-assembled body for this call.
    ///
    /// **Returns**
    /// - `Ok(())` once the request completed, whatever the HTTP status.
    /// - `Err(..)` if the request could not be made at all (bad URL,
    ///   connection failure, serialization error). No retry happens.
    async fn post(
        &self,
        endpoint: &str,
        payload: &WebhookPayload,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
