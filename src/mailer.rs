//! Mail transport trait and delivery result types.
//!
//! The campaign sender keeps its transport as an `Arc<dyn Mailer>` so the
//! provider can be chosen at runtime from environment variables. Native async
//! traits are not object-safe, so the trait goes through `#[async_trait]`; the
//! boxed future per call is noise next to network latency.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::error::MailError;

/// Result of a successful delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Message ID assigned by the provider
    pub message_id: String,
    /// Optional provider-specific response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_response: Option<serde_json::Value>,
}

impl DeliveryResult {
    /// Create a new delivery result with just a message ID.
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            provider_response: None,
        }
    }

    /// Create a delivery result with provider response.
    pub fn with_response(message_id: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            message_id: message_id.into(),
            provider_response: Some(response),
        }
    }
}

/// A mail transport.
///
/// Every provider (SMTP, Resend, the in-memory `LocalMailer`, ...) implements
/// this. The campaign sender calls [`deliver`](Mailer::deliver) once per
/// recipient and turns any error into a per-recipient failure.
///
/// ```ignore
/// use campaigner::{Email, Mailer};
/// use campaigner::providers::LoggerMailer;
///
/// let mailer = LoggerMailer::new();
/// let email = Email::new()
///     .from("placements@uni.example.edu")
///     .to("hr@acme.test")
///     .subject("Hello")
///     .text_body("World");
///
/// let result = mailer.deliver(&email).await?;
/// println!("Sent with ID: {}", result.message_id);
/// ```
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email.
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError>;

    /// Get the provider name (for logging/metrics).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }

    /// Validate configuration.
    ///
    /// Called before a campaign starts so a misconfigured transport is
    /// reported once instead of once per recipient.
    fn validate_config(&self) -> Result<(), MailError> {
        Ok(())
    }
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for std::sync::Arc<M> {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        (**self).deliver(email).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn validate_config(&self) -> Result<(), MailError> {
        (**self).validate_config()
    }
}
