//! Retrying transport wrapper.
//!
//! The campaign sender makes exactly one delivery call per recipient. Retrying
//! transient failures belongs to the transport, so it is a wrapper:
//!
//! ```rust,ignore
//! use campaigner::{CampaignSender, RetryExt, RetryPolicy};
//! use campaigner::providers::ResendMailer;
//!
//! let transport = ResendMailer::new(api_key).with_retry(RetryPolicy::default());
//! let sender = CampaignSender::new(transport);
//! ```
//!
//! The sender's per-recipient timeout covers all attempts together.

use async_trait::async_trait;
use std::time::Duration;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `0` behaves like `1`.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// A transport that retries [transient](MailError::is_transient) failures.
///
/// Created by [`RetryExt::with_retry`].
#[derive(Debug, Clone)]
pub struct WithRetry<M> {
    inner: M,
    policy: RetryPolicy,
}

impl<M> WithRetry<M> {
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

#[async_trait]
impl<M: Mailer> Mailer for WithRetry<M> {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.deliver(email).await {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        error = %err,
                        "Transient delivery failure, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn validate_config(&self) -> Result<(), MailError> {
        self.inner.validate_config()
    }
}

/// Adds [`with_retry`](RetryExt::with_retry) to every transport.
pub trait RetryExt: Mailer + Sized {
    fn with_retry(self, policy: RetryPolicy) -> WithRetry<Self> {
        WithRetry {
            inner: self,
            policy,
        }
    }
}

impl<M: Mailer + Sized> RetryExt for M {}
