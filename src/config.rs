//! Campaign sender settings.

use std::env;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::address::Address;
use crate::error::MailError;

/// Default per-recipient transport timeout.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of dispatches in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// How the rendered body is handed to the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[default]
    Text,
    Html,
}

impl std::str::FromStr for BodyFormat {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            other => Err(MailError::Configuration(format!(
                "Unknown CAMPAIGN_BODY_FORMAT: {}. Valid values are: text, html",
                other
            ))),
        }
    }
}

/// Settings for [`CampaignSender`](crate::CampaignSender).
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Sender address. Falls back to `EMAIL_FROM` / `EMAIL_FROM_NAME`.
    pub from: Option<Address>,
    /// Optional reply-to for every message.
    pub reply_to: Option<Address>,
    /// Upper bound for a single transport call.
    pub send_timeout: Duration,
    /// Dispatches in flight at once, clamped to `1..=Semaphore::MAX_PERMITS`.
    pub max_concurrency: usize,
    pub body_format: BodyFormat,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            from: None,
            reply_to: None,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            body_format: BodyFormat::Text,
        }
    }
}

impl SenderConfig {
    /// Read settings from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `EMAIL_FROM`, `EMAIL_FROM_NAME` | unset |
    /// | `CAMPAIGN_REPLY_TO` | unset |
    /// | `CAMPAIGN_SEND_TIMEOUT_SECS` | 20 |
    /// | `CAMPAIGN_MAX_CONCURRENCY` | 4 |
    /// | `CAMPAIGN_BODY_FORMAT` | `text` |
    pub fn from_env() -> Result<Self, MailError> {
        let mut config = Self {
            from: crate::default_from(),
            ..Self::default()
        };

        if let Ok(reply_to) = env::var("CAMPAIGN_REPLY_TO") {
            config.reply_to = Some(Address::new(reply_to));
        }
        if let Ok(secs) = env::var("CAMPAIGN_SEND_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MailError::Configuration(format!(
                    "CAMPAIGN_SEND_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.send_timeout = Duration::from_secs(secs.max(1));
        }
        if let Ok(n) = env::var("CAMPAIGN_MAX_CONCURRENCY") {
            config.max_concurrency = n
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=Semaphore::MAX_PERMITS).contains(n))
                .ok_or_else(|| {
                    MailError::Configuration(format!(
                        "CAMPAIGN_MAX_CONCURRENCY must be between 1 and {}, got '{}'",
                        Semaphore::MAX_PERMITS,
                        n
                    ))
                })?;
        }
        if let Ok(format) = env::var("CAMPAIGN_BODY_FORMAT") {
            config.body_format = format.parse()?;
        }

        Ok(config)
    }

    pub fn from(mut self, from: impl Into<Address>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<Address>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn body_format(mut self, format: BodyFormat) -> Self {
        self.body_format = format;
        self
    }

    pub(crate) fn permits(&self) -> usize {
        self.max_concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }
}
