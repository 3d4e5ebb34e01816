//! Recipient directory: the registered companies a coordinator can target.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::CampaignError;
use crate::recipient::DirectoryRecipient;

/// Source of directory recipients.
///
/// Implementations usually query the placement database scoped to the
/// coordinator's organization. There is no paging: callers load the full
/// candidate list for selection.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Companies whose name, email or industry contains `filter`
    /// (case-insensitive). `None` or a blank filter returns everything.
    async fn list_companies(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<DirectoryRecipient>, CampaignError>;
}

/// Directory held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    companies: RwLock<Vec<DirectoryRecipient>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace (by id) a company.
    pub fn upsert(&self, company: DirectoryRecipient) {
        let mut companies = self.companies.write();
        match companies.iter_mut().find(|c| c.id == company.id) {
            Some(existing) => *existing = company,
            None => companies.push(company),
        }
    }

    pub fn len(&self) -> usize {
        self.companies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.read().is_empty()
    }
}

impl FromIterator<DirectoryRecipient> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = DirectoryRecipient>>(iter: I) -> Self {
        let directory = Self::new();
        for company in iter {
            directory.upsert(company);
        }
        directory
    }
}

#[async_trait]
impl RecipientDirectory for InMemoryDirectory {
    async fn list_companies(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<DirectoryRecipient>, CampaignError> {
        let companies = self.companies.read();
        Ok(match filter {
            Some(needle) => companies
                .iter()
                .filter(|c| c.matches(needle))
                .cloned()
                .collect(),
            None => companies.clone(),
        })
    }
}
