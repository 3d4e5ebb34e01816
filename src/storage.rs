//! In-memory store behind `LocalMailer`.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::email::Email;

/// A captured email.
#[derive(Debug, Clone)]
pub struct StoredEmail {
    pub id: String,
    pub email: Email,
    pub sent_at: DateTime<Utc>,
}

/// Thread-safe list of captured emails, oldest first internally.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    emails: RwLock<Vec<StoredEmail>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store an email and return its generated id.
    pub fn push(&self, mut email: Email) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let sent_at = Utc::now();
        email
            .private
            .insert("sent_at".to_string(), serde_json::json!(sent_at.to_rfc3339()));

        self.emails.write().push(StoredEmail {
            id: id.clone(),
            email,
            sent_at,
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<StoredEmail> {
        self.emails.read().iter().find(|s| s.id == id).cloned()
    }

    /// All emails, newest first.
    pub fn all(&self) -> Vec<StoredEmail> {
        self.emails.read().iter().rev().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.emails.read().len()
    }

    pub fn clear(&self) {
        self.emails.write().clear();
    }

    /// Remove and return all emails, newest first.
    pub fn flush(&self) -> Vec<StoredEmail> {
        let mut emails = std::mem::take(&mut *self.emails.write());
        emails.reverse();
        emails
    }
}
