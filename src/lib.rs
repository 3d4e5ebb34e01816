//! # Campaigner
//!
//! Compose, preview, and batch-send personalized email campaigns to
//! registered companies and hand-typed addresses.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campaigner::{CampaignSender, Draft, Template};
//! use campaigner::providers::LoggerMailer;
//!
//! let template = Template::new("invitation", "Invitation")
//!     .subject("Hola {{companyName}}")
//!     .body("Estimado {{contactName}}, visita {{portalUrl}}")
//!     .variable("portalUrl");
//!
//! let draft = Draft::new()
//!     .select_template(Some(&template))
//!     .set_variable("portalUrl", "https://jobs.example.edu")
//!     .add_ad_hoc_recipient("Acme Corp", "hr@acme.test")?;
//!
//! let sender = CampaignSender::new(LoggerMailer::new());
//! let report = sender.send_draft(&draft).await?;
//! println!("{} sent, {} failed", report.sent(), report.failed());
//! ```
//!
//! Or let the environment pick the transport:
//!
//! ```rust,ignore
//! let report = campaigner::send_campaign(&draft).await?;
//! ```
//!
//! ## Placeholders
//!
//! Subject and body are rendered per recipient in two passes: the variables
//! declared by the chosen template (`{{portalUrl}}`, unset ones become
//! `[portalUrl]`), then `{{companyName}}` and `{{contactName}}` (defaulting to
//! `Estimado/a`). Anything else is left as written.
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `EMAIL_PROVIDER` | `smtp`, `resend`, `local`, `logger`, `logger_full` |
//! | `EMAIL_FROM` | Default sender email |
//! | `EMAIL_FROM_NAME` | Default sender name |
//! | `SMTP_HOST` | SMTP server host |
//! | `SMTP_PORT` | SMTP server port (default: 587) |
//! | `SMTP_USERNAME` | SMTP username |
//! | `SMTP_PASSWORD` | SMTP password |
//! | `RESEND_API_KEY` | Resend API key |
//! | `CAMPAIGN_REPLY_TO` | Reply-to for campaign emails |
//! | `CAMPAIGN_SEND_TIMEOUT_SECS` | Per-recipient timeout (default: 20) |
//! | `CAMPAIGN_MAX_CONCURRENCY` | Dispatches in flight (default: 4) |
//! | `CAMPAIGN_BODY_FORMAT` | `text` or `html` (default: `text`) |
//!
//! ## Feature Flags
//!
//! - `smtp` - SMTP transport via lettre
//! - `resend` - Resend API transport
//! - `local` - LocalMailer and assertion helpers for development and testing
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//! - `dev` - Enables local
//!
//! ## Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `campaigner_dispatch_total` | Counter | provider, status | Emails dispatched |
//! | `campaigner_dispatch_duration_seconds` | Histogram | provider | Single dispatch duration |
//! | `campaigner_campaign_total` | Counter | provider | Campaigns sent |
//! | `campaigner_campaign_size` | Histogram | provider | Recipients per campaign |
//! | `campaigner_campaign_duration_seconds` | Histogram | provider | Whole campaign duration |

/// The version of the campaigner crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod catalog;
mod composer;
mod config;
mod directory;
mod draft;
mod email;
mod error;
mod mailer;
mod recipient;
mod render;
mod report;
mod retry;
mod sender;
mod template;

pub mod providers;

#[cfg(feature = "local")]
mod storage;

#[cfg(feature = "local")]
pub mod testing;

use parking_lot::RwLock;
use std::env;
use std::sync::Arc;

// Re-exports
pub use address::{Address, ToAddress};
pub use catalog::{StaticCatalog, TemplateCatalog};
pub use composer::{Composer, ComposerState};
pub use config::{BodyFormat, SenderConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_SEND_TIMEOUT};
pub use directory::{InMemoryDirectory, RecipientDirectory};
pub use draft::Draft;
pub use email::Email;
pub use error::{CampaignError, MailError};
pub use mailer::{DeliveryResult, Mailer};
pub use recipient::{AdHocRecipient, CompanyId, DirectoryRecipient, Recipient, RecipientKind};
pub use render::{
    render_message, RenderPass, RenderedMessage, Renderer, Substitution, COMPANY_NAME,
    CONTACT_NAME, DEFAULT_CONTACT_NAME,
};
pub use report::{CampaignReport, DispatchFailure, SendOutcome};
pub use retry::{RetryExt, RetryPolicy, WithRetry};
pub use sender::{validate, CampaignSender};
pub use template::{placeholder, Template};

#[cfg(feature = "local")]
pub use storage::{MemoryStorage, StoredEmail};

// ============================================================================
// Global Transport Configuration
// ============================================================================

/// Global transport - swappable for testing
static MAILER: RwLock<Option<Arc<dyn Mailer>>> = RwLock::new(None);

/// Get the default from address from environment.
pub fn default_from() -> Option<Address> {
    let email = env::var("EMAIL_FROM").ok()?;
    match env::var("EMAIL_FROM_NAME").ok() {
        Some(name) => Some(Address::with_name(name, email)),
        None => Some(Address::new(email)),
    }
}

/// Auto-detect a transport from enabled features and available credentials.
fn detect_provider() -> Option<&'static str> {
    #[cfg(feature = "resend")]
    if env::var("RESEND_API_KEY").is_ok() {
        return Some("resend");
    }
    #[cfg(feature = "smtp")]
    if env::var("SMTP_HOST").is_ok() {
        return Some("smtp");
    }
    #[cfg(feature = "local")]
    {
        return Some("local");
    }
    #[allow(unreachable_code)]
    None
}

fn provider_from_env() -> Option<String> {
    match env::var("EMAIL_PROVIDER") {
        Ok(p) => Some(p.to_lowercase()),
        Err(_) => detect_provider().map(|p| {
            tracing::debug!(provider = p, "Auto-detected email provider");
            p.to_string()
        }),
    }
}

fn feature_disabled(provider: &str) -> MailError {
    MailError::Configuration(format!(
        "EMAIL_PROVIDER={provider} but '{provider}' feature is not enabled. \
        Add `features = [\"{provider}\"]` to Cargo.toml"
    ))
}

/// Create a transport from environment variables.
fn create_mailer_from_env() -> Result<Arc<dyn Mailer>, MailError> {
    let provider = provider_from_env().ok_or_else(|| {
        MailError::Configuration(
            "EMAIL_PROVIDER not set and could not auto-detect. \
            Set EMAIL_PROVIDER or ensure an API key is configured."
                .into(),
        )
    })?;

    match provider.as_str() {
        #[cfg(feature = "smtp")]
        "smtp" => {
            let host = env::var("SMTP_HOST")
                .map_err(|_| MailError::Configuration("SMTP_HOST not set".into()))?;
            let port: u16 = env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .unwrap_or(587);
            let username = env::var("SMTP_USERNAME").unwrap_or_default();
            let password = env::var("SMTP_PASSWORD").unwrap_or_default();

            let builder = providers::SmtpMailer::new(&host, port);
            let mailer = if username.is_empty() {
                builder.build()
            } else {
                builder.credentials(&username, &password).build()
            };
            Ok(Arc::new(mailer))
        }
        #[cfg(not(feature = "smtp"))]
        "smtp" => Err(feature_disabled("smtp")),

        #[cfg(feature = "resend")]
        "resend" => {
            let key = env::var("RESEND_API_KEY")
                .map_err(|_| MailError::Configuration("RESEND_API_KEY not set".into()))?;
            Ok(Arc::new(providers::ResendMailer::new(&key)))
        }
        #[cfg(not(feature = "resend"))]
        "resend" => Err(feature_disabled("resend")),

        #[cfg(feature = "local")]
        "local" => Ok(Arc::new(providers::LocalMailer::new())),
        #[cfg(not(feature = "local"))]
        "local" => Err(feature_disabled("local")),

        "logger" => Ok(Arc::new(providers::LoggerMailer::new())),
        "logger_full" => Ok(Arc::new(providers::LoggerMailer::full())),

        _ => Err(MailError::Configuration(format!(
            "Unknown EMAIL_PROVIDER: {}. Valid providers are: smtp, resend, local, logger, logger_full",
            provider
        ))),
    }
}

/// Get or initialize the global transport.
fn get_mailer() -> Result<Arc<dyn Mailer>, MailError> {
    // Fast path: already configured
    if let Some(ref mailer) = *MAILER.read() {
        return Ok(Arc::clone(mailer));
    }

    let mailer = create_mailer_from_env()?;
    let mut guard = MAILER.write();

    // Another caller may have won the race
    Ok(Arc::clone(guard.get_or_insert(mailer)))
}

/// Check if a transport is configured and its feature is enabled.
///
/// Logs a warning if the provider is named but its feature flag is off.
pub fn is_configured() -> bool {
    let Some(provider) = provider_from_env() else {
        return false;
    };
    match provider.as_str() {
        "smtp" if cfg!(feature = "smtp") => env::var("SMTP_HOST").is_ok(),
        "resend" if cfg!(feature = "resend") => env::var("RESEND_API_KEY").is_ok(),
        "local" if cfg!(feature = "local") => true,
        "logger" | "logger_full" => true,
        "smtp" | "resend" | "local" => {
            tracing::warn!("{}", feature_disabled(&provider));
            false
        }
        _ => false,
    }
}

/// Initialize the global transport from environment variables.
///
/// ```rust,ignore
/// // In main.rs
/// campaigner::init().ok(); // Ignore error if email not configured
/// ```
pub fn init() -> Result<(), MailError> {
    if !is_configured() {
        return Err(MailError::NotConfigured);
    }
    get_mailer()?.validate_config()
}

/// Send a draft to its recipients through the global transport.
///
/// Sender settings come from [`SenderConfig::from_env`].
pub async fn send_campaign(draft: &Draft) -> Result<CampaignReport, CampaignError> {
    let sender = CampaignSender::from_arc(get_mailer()?).with_config(SenderConfig::from_env()?);
    sender.send_draft(draft).await
}

/// Preview a draft for one recipient. No I/O.
pub fn render_preview(draft: &Draft, sample: &Recipient) -> RenderedMessage {
    render_message(draft, sample)
}

// ============================================================================
// Manual Configuration (for testing or custom setups)
// ============================================================================

/// Set the global transport used by [`send_campaign`].
///
/// ```rust,ignore
/// use campaigner::{configure, providers::LocalMailer};
///
/// configure(LocalMailer::new());
/// ```
pub fn configure<M: Mailer + 'static>(mailer: M) {
    *MAILER.write() = Some(Arc::new(mailer));
}

/// Configure with an Arc'd transport.
pub fn configure_arc(mailer: Arc<dyn Mailer>) {
    *MAILER.write() = Some(mailer);
}

/// Forget the global transport; the next send re-reads the environment.
pub fn reset() {
    *MAILER.write() = None;
}

/// The configured global transport, if initialized.
pub fn mailer() -> Option<Arc<dyn Mailer>> {
    MAILER.read().as_ref().cloned()
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AdHocRecipient, CampaignError, CampaignReport, CampaignSender, Composer, Draft,
        DirectoryRecipient, Email, MailError, Mailer, Recipient, RecipientDirectory,
        RenderedMessage, SenderConfig, Template, TemplateCatalog,
    };
    pub use crate::{default_from, is_configured, render_preview, send_campaign};
}
