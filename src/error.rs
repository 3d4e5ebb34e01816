//! Error types for campaigner.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by a mail transport for a single delivery attempt.
///
/// Inside a campaign these never escape [`CampaignSender::send`](crate::CampaignSender::send);
/// they are recorded as a [`DispatchFailure`](crate::DispatchFailure) for the recipient.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    /// Mail transport is not configured.
    #[error("Email provider not configured")]
    NotConfigured,

    /// Configuration error (missing env var, invalid value, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing required field on the outgoing email.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The transport rejected the address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Error building the message.
    #[error("Build error: {0}")]
    BuildError(String),

    /// Error sending the email.
    #[error("Send error: {0}")]
    SendError(String),

    /// The transport did not answer in time.
    #[error("Timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Provider-specific error with details.
    #[error("Provider error ({provider}): {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
        /// Optional HTTP status code
        status: Option<u16>,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MailError {
    /// Create a provider-specific error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: None,
        }
    }

    /// Create a provider error with HTTP status.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Whether another attempt might succeed.
    ///
    /// Connection problems, timeouts, throttling and 5xx answers are transient;
    /// bad addresses and configuration mistakes are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SendError(_) | Self::HttpError(_) | Self::Timeout(_) => true,
            Self::ProviderError {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(feature = "_http")]
impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::BuildError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::SendError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

/// Errors surfaced to the coordinator while composing or starting a campaign.
#[derive(Debug, Clone, Error)]
pub enum CampaignError {
    /// A required campaign field (subject, body, recipients) is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An address failed the syntax check.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The ad-hoc address was already added to the draft.
    #[error("Recipient already added: {0}")]
    DuplicateRecipient(String),

    /// No template with this id exists in the catalog.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// The composer session no longer accepts this action.
    #[error("Composer session is {0}")]
    SessionClosed(&'static str),

    /// The recipient directory could not be queried.
    #[error("Directory error: {0}")]
    Directory(String),

    /// Transport configuration problem (global mailer setup).
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl CampaignError {
    /// Whether this is a pre-flight validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}
