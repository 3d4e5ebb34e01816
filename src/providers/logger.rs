//! Transport that only logs.
//!
//! Handy on staging, or to dry-run a campaign and read the rendered messages
//! in the logs before sending for real.

use async_trait::async_trait;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};

/// Emits a tracing event per email and reports success.
pub struct LoggerMailer {
    /// Log subject and body too, not just the recipient.
    log_full: bool,
}

impl LoggerMailer {
    pub fn new() -> Self {
        Self { log_full: false }
    }

    pub fn full() -> Self {
        Self { log_full: true }
    }

    pub fn log_full(mut self, full: bool) -> Self {
        self.log_full = full;
        self
    }
}

impl Default for LoggerMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for LoggerMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        let message_id = uuid::Uuid::new_v4().to_string();
        let to: Vec<String> = email.to.iter().map(|a| a.formatted()).collect();

        if self.log_full {
            tracing::info!(
                message_id = %message_id,
                from = ?email.from.as_ref().map(|a| a.formatted()),
                to = ?to,
                subject = %email.subject,
                html = email.html_body.is_some(),
                "Email logged (full)"
            );
            if let Some(body) = email.body() {
                tracing::debug!(message_id = %message_id, body = %body, "Email body");
            }
        } else {
            tracing::info!(message_id = %message_id, to = ?to, "Email logged");
        }

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}
