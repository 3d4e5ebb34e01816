//! In-memory transport for development and tests.
//!
//! Captures every email instead of sending it and can be told to fail, either
//! for everyone or for chosen addresses, to exercise partial-failure reports.
//!
//! ```rust,ignore
//! use campaigner::providers::LocalMailer;
//! use campaigner::testing::*;
//! use campaigner::CampaignSender;
//!
//! let mailer = LocalMailer::new();
//! mailer.fail_for("bounce@acme.test", "mailbox does not exist");
//!
//! let report = CampaignSender::new(mailer.clone()).send_draft(&draft).await?;
//!
//! assert_eq!(report.failed(), 1);
//! assert_email_to(&mailer, "hr@acme.test");
//! assert_no_emails_to(&mailer, "bounce@acme.test");
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::storage::{MemoryStorage, StoredEmail};

#[derive(Debug, Default)]
struct Failures {
    all: Option<String>,
    /// Keyed by lowercased address.
    by_address: HashMap<String, String>,
}

/// Transport that stores emails in memory.
///
/// Clones share storage and failure settings.
#[derive(Debug, Clone)]
pub struct LocalMailer {
    storage: Arc<MemoryStorage>,
    failures: Arc<RwLock<Failures>>,
}

impl LocalMailer {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::shared())
    }

    pub fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        Self {
            storage,
            failures: Arc::default(),
        }
    }

    pub fn storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.storage)
    }

    // =========================================================================
    // Failure Simulation
    // =========================================================================

    /// Fail every delivery with `message`.
    pub fn set_failure(&self, message: impl Into<String>) {
        self.failures.write().all = Some(message.into());
    }

    /// Fail deliveries addressed to `email` (ignoring case) with `message`.
    pub fn fail_for(&self, email: &str, message: impl Into<String>) {
        self.failures
            .write()
            .by_address
            .insert(email.trim().to_lowercase(), message.into());
    }

    pub fn clear_failure(&self) {
        let mut failures = self.failures.write();
        failures.all = None;
        failures.by_address.clear();
    }

    fn failure_for(&self, email: &Email) -> Option<String> {
        let failures = self.failures.read();
        if let Some(ref message) = failures.all {
            return Some(message.clone());
        }
        email
            .to
            .iter()
            .find_map(|a| failures.by_address.get(&a.email.to_lowercase()).cloned())
    }

    // =========================================================================
    // Email Access
    // =========================================================================

    /// All captured emails, newest first.
    pub fn emails(&self) -> Vec<StoredEmail> {
        self.storage.all()
    }

    pub fn last_email(&self) -> Option<StoredEmail> {
        self.storage.all().into_iter().next()
    }

    pub fn email_count(&self) -> usize {
        self.storage.count()
    }

    pub fn has_emails(&self) -> bool {
        self.storage.count() > 0
    }

    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Remove and return all captured emails.
    pub fn flush(&self) -> Vec<StoredEmail> {
        self.storage.flush()
    }

    pub fn sent_to(&self, email: &str) -> bool {
        self.storage
            .all()
            .iter()
            .any(|stored| stored.email.to.iter().any(|a| a.same_email(email)))
    }

    pub fn find_emails<F>(&self, predicate: F) -> Vec<StoredEmail>
    where
        F: Fn(&Email) -> bool,
    {
        self.storage
            .all()
            .into_iter()
            .filter(|stored| predicate(&stored.email))
            .collect()
    }
}

impl Default for LocalMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for LocalMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        if let Some(message) = self.failure_for(email) {
            return Err(MailError::SendError(message));
        }

        let message_id = self.storage.push(email.clone());
        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
