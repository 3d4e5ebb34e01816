//! Per-recipient outcomes and the campaign summary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mailer::DeliveryResult;
use crate::recipient::{Recipient, RecipientKind};

/// Why one recipient did not get the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub address: String,
    pub detail: String,
}

impl DispatchFailure {
    pub fn new(address: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.detail)
    }
}

impl std::error::Error for DispatchFailure {}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub recipient: Recipient,
    pub result: Result<DeliveryResult, DispatchFailure>,
}

impl SendOutcome {
    pub fn delivered(recipient: Recipient, delivery: DeliveryResult) -> Self {
        Self {
            recipient,
            result: Ok(delivery),
        }
    }

    pub fn failed(recipient: Recipient, detail: impl Into<String>) -> Self {
        let failure = DispatchFailure::new(recipient.email(), detail);
        Self {
            recipient,
            result: Err(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn failure(&self) -> Option<&DispatchFailure> {
        self.result.as_ref().err()
    }
}

/// Summary of a finished send.
///
/// Built once from the complete outcome list and read-only afterwards.
/// Serializes as `{totalCompanies, totalCustomEmails, sent, failed, errors}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    total_companies: usize,
    total_custom_emails: usize,
    sent: usize,
    failed: usize,
    errors: Vec<String>,
    #[serde(skip)]
    outcomes: Vec<SendOutcome>,
}

impl CampaignReport {
    pub fn from_outcomes(outcomes: Vec<SendOutcome>) -> Self {
        let total_companies = outcomes
            .iter()
            .filter(|o| o.recipient.kind() == RecipientKind::Directory)
            .count();
        let errors: Vec<String> = outcomes
            .iter()
            .filter_map(SendOutcome::failure)
            .map(ToString::to_string)
            .collect();
        let failed = errors.len();

        Self {
            total_companies,
            total_custom_emails: outcomes.len() - total_companies,
            sent: outcomes.len() - failed,
            failed,
            errors,
            outcomes,
        }
    }

    /// Directory recipients targeted.
    pub fn total_companies(&self) -> usize {
        self.total_companies
    }

    /// Hand-typed recipients targeted.
    pub fn total_custom_emails(&self) -> usize {
        self.total_custom_emails
    }

    pub fn total(&self) -> usize {
        self.total_companies + self.total_custom_emails
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// One `"<address>: <reason>"` line per failed recipient.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn outcomes(&self) -> &[SendOutcome] {
        &self.outcomes
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}
