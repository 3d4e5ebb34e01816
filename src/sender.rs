//! Rendering and batch dispatch of a campaign.
//!
//! [`CampaignSender::send`] renders one message per recipient and hands each
//! to the transport on its own task. A failing recipient never stops the
//! others: transport errors, timeouts and crashed tasks all end up as a
//! failed [`SendOutcome`] in the [`CampaignReport`]. Only the pre-flight checks
//! (empty subject, body or recipient list, broken transport configuration)
//! fail the call itself, and they do so before anything is dispatched.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::{BodyFormat, SenderConfig};
use crate::draft::Draft;
use crate::email::Email;
use crate::error::{CampaignError, MailError};
use crate::mailer::{DeliveryResult, Mailer};
use crate::recipient::Recipient;
use crate::render::{render_message, RenderedMessage};
use crate::report::{CampaignReport, SendOutcome};

/// Sends a [`Draft`] to a list of recipients through one transport.
///
/// ```rust,ignore
/// use campaigner::{CampaignSender, Draft};
/// use campaigner::providers::LoggerMailer;
///
/// let sender = CampaignSender::new(LoggerMailer::new());
/// let draft = Draft::new()
///     .with_subject("Hola {{companyName}}")
///     .with_body("Estimado {{contactName}}")
///     .add_ad_hoc_recipient("Feria", "feria@example.org")?;
///
/// let report = sender.send_draft(&draft).await?;
/// assert_eq!(report.sent(), 1);
/// ```
#[derive(Clone)]
pub struct CampaignSender {
    transport: Arc<dyn Mailer>,
    config: SenderConfig,
}

impl std::fmt::Debug for CampaignSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignSender")
            .field("provider", &self.transport.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl CampaignSender {
    pub fn new<M: Mailer + 'static>(transport: M) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn Mailer>) -> Self {
        Self {
            transport,
            config: SenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.transport.provider_name()
    }

    /// Render `draft` as `sample` would receive it. No I/O.
    pub fn render_preview(&self, draft: &Draft, sample: &Recipient) -> RenderedMessage {
        render_message(draft, sample)
    }

    /// Send to the draft's own recipient list (companies, then ad-hoc).
    pub async fn send_draft(&self, draft: &Draft) -> Result<CampaignReport, CampaignError> {
        self.send(draft, &draft.recipients()).await
    }

    /// Render and dispatch one message per recipient.
    ///
    /// Returns `Err` only when a pre-flight check fails; the transport is not
    /// called in that case. Otherwise every recipient gets an outcome and the
    /// report lists one `"<address>: <reason>"` error per failure.
    pub async fn send(
        &self,
        draft: &Draft,
        recipients: &[Recipient],
    ) -> Result<CampaignReport, CampaignError> {
        validate(draft, recipients)?;
        self.transport.validate_config()?;

        let provider = self.transport.provider_name();
        let span = tracing::info_span!(
            "campaigner.send",
            provider = provider,
            recipients = recipients.len(),
            template = draft.template().map(|t| t.id.as_str()),
        );

        async move {
            let duplicates = duplicate_addresses(recipients);
            if !duplicates.is_empty() {
                tracing::warn!(
                    addresses = ?duplicates,
                    "Some addresses appear more than once and will receive several copies"
                );
            }

            #[cfg(feature = "metrics")]
            let start = Instant::now();

            let results = self.dispatch_all(draft, recipients).await;

            let outcomes = recipients
                .iter()
                .cloned()
                .zip(results)
                .map(|(recipient, result)| match result {
                    Some(Ok(delivery)) => SendOutcome::delivered(recipient, delivery),
                    Some(Err(err)) => SendOutcome::failed(recipient, err.to_string()),
                    None => SendOutcome::failed(recipient, "dispatch task aborted"),
                })
                .collect();

            let report = CampaignReport::from_outcomes(outcomes);

            #[cfg(feature = "metrics")]
            {
                metrics::counter!("campaigner_campaign_total", "provider" => provider)
                    .increment(1);
                metrics::histogram!("campaigner_campaign_size", "provider" => provider)
                    .record(recipients.len() as f64);
                metrics::histogram!("campaigner_campaign_duration_seconds", "provider" => provider)
                    .record(start.elapsed().as_secs_f64());
            }

            tracing::info!(
                sent = report.sent(),
                failed = report.failed(),
                "Campaign finished"
            );

            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// One slot per recipient, in recipient order. `None` means the task died.
    async fn dispatch_all(
        &self,
        draft: &Draft,
        recipients: &[Recipient],
    ) -> Vec<Option<Result<DeliveryResult, MailError>>> {
        let semaphore = Arc::new(Semaphore::new(self.config.permits()));
        let timeout = self.config.send_timeout;
        let mut tasks = JoinSet::new();

        for (index, recipient) in recipients.iter().enumerate() {
            let email = self.build_email(recipient, render_message(draft, recipient));
            let transport = Arc::clone(&self.transport);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(
                async move {
                    let result = dispatch(transport.as_ref(), &email, &semaphore, timeout).await;
                    (index, result)
                }
                .in_current_span(),
            );
        }

        let mut slots = vec![None; recipients.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(err) => tracing::error!(error = %err, "Dispatch task failed"),
            }
        }
        slots
    }

    fn build_email(&self, recipient: &Recipient, message: RenderedMessage) -> Email {
        let mut email = Email::new().to(recipient).subject(message.subject);

        if let Some(from) = self.config.from.clone().or_else(crate::default_from) {
            email = email.from(from);
        }
        if let Some(ref reply_to) = self.config.reply_to {
            email = email.reply_to(reply_to);
        }

        match self.config.body_format {
            BodyFormat::Text => email.text_body(message.body),
            BodyFormat::Html => email.html_body(message.body),
        }
    }
}

/// Pre-flight checks for [`CampaignSender::send`].
pub fn validate(draft: &Draft, recipients: &[Recipient]) -> Result<(), CampaignError> {
    if draft.subject().trim().is_empty() {
        return Err(CampaignError::MissingField("subject"));
    }
    if draft.body().trim().is_empty() {
        return Err(CampaignError::MissingField("body"));
    }
    if recipients.is_empty() {
        return Err(CampaignError::MissingField("recipients"));
    }
    Ok(())
}

async fn dispatch(
    transport: &dyn Mailer,
    email: &Email,
    semaphore: &Semaphore,
    timeout: Duration,
) -> Result<DeliveryResult, MailError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| MailError::Internal("dispatch pool closed".into()))?;

    let to = email.to.first().map(|a| a.email.as_str()).unwrap_or_default();
    tracing::debug!(to = %to, "Dispatching email");

    #[cfg(feature = "metrics")]
    let start = Instant::now();

    let result = match tokio::time::timeout(timeout, transport.deliver(email)).await {
        Ok(result) => result,
        Err(_) => Err(MailError::Timeout(timeout)),
    };

    #[cfg(feature = "metrics")]
    {
        let provider = transport.provider_name();
        let status = if result.is_ok() { "success" } else { "error" };
        metrics::counter!("campaigner_dispatch_total", "provider" => provider, "status" => status)
            .increment(1);
        metrics::histogram!("campaigner_dispatch_duration_seconds", "provider" => provider)
            .record(start.elapsed().as_secs_f64());
    }

    match &result {
        Ok(r) => tracing::debug!(to = %to, message_id = %r.message_id, "Email delivered"),
        Err(e) => tracing::warn!(to = %to, error = %e, "Email delivery failed"),
    }

    result
}

fn duplicate_addresses(recipients: &[Recipient]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for recipient in recipients {
        *seen.entry(recipient.email().to_lowercase()).or_default() += 1;
    }
    let mut duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(email, _)| email)
        .collect();
    duplicates.sort();
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipient::{AdHocRecipient, DirectoryRecipient};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every delivery; fails for addresses listed in `failing`.
    #[derive(Default)]
    struct Recorder {
        failing: Vec<&'static str>,
        delivered: Mutex<Vec<Email>>,
    }

    #[async_trait]
    impl Mailer for Recorder {
        async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
            self.delivered.lock().push(email.clone());
            let to = &email.to[0].email;
            if self.failing.contains(&to.as_str()) {
                return Err(MailError::SendError("mailbox unavailable".into()));
            }
            Ok(DeliveryResult::new(format!("id-{}", to)))
        }

        fn provider_name(&self) -> &'static str {
            "recorder"
        }
    }

    fn draft() -> Draft {
        Draft::new()
            .with_subject("Hola {{companyName}}")
            .with_body("Estimado {{contactName}}")
    }

    fn recipients() -> Vec<Recipient> {
        vec![
            DirectoryRecipient::new("c-1", "Acme Corp", "hr@acme.test")
                .contact_name("Laura")
                .into(),
            AdHocRecipient::new("Feria", "feria@example.org").into(),
        ]
    }

    #[test]
    fn test_validate() {
        let r = recipients();
        assert!(validate(&draft(), &r).is_ok());
        assert!(matches!(
            validate(&draft().with_subject("  "), &r),
            Err(CampaignError::MissingField("subject"))
        ));
        assert!(matches!(
            validate(&draft().with_body(""), &r),
            Err(CampaignError::MissingField("body"))
        ));
        assert!(matches!(
            validate(&draft(), &[]),
            Err(CampaignError::MissingField("recipients"))
        ));
    }

    #[test]
    fn test_duplicate_addresses() {
        let mut r = recipients();
        r.push(AdHocRecipient::new("Acme", "HR@acme.test").into());
        assert_eq!(duplicate_addresses(&r), vec!["hr@acme.test".to_string()]);
        assert!(duplicate_addresses(&recipients()).is_empty());
    }

    #[test]
    fn test_build_email() {
        let sender = CampaignSender::new(Recorder::default()).with_config(
            SenderConfig::default()
                .from("placements@uni.example.edu")
                .reply_to("coordinator@uni.example.edu")
                .body_format(BodyFormat::Html),
        );
        let recipient = &recipients()[0];
        let email = sender.build_email(
            recipient,
            RenderedMessage {
                subject: "S".into(),
                body: "<p>B</p>".into(),
            },
        );

        assert_eq!(email.from.unwrap().email, "placements@uni.example.edu");
        assert_eq!(email.to[0].formatted(), "Acme Corp <hr@acme.test>");
        assert_eq!(email.reply_to[0].email, "coordinator@uni.example.edu");
        assert_eq!(email.html_body.as_deref(), Some("<p>B</p>"));
        assert!(email.text_body.is_none());
    }

    #[tokio::test]
    async fn test_send_renders_per_recipient() {
        let recorder = Arc::new(Recorder::default());
        let sender = CampaignSender::from_arc(recorder.clone());

        let report = sender.send(&draft(), &recipients()).await.unwrap();
        assert_eq!(report.sent(), 2);
        assert_eq!(report.failed(), 0);

        let mut delivered = recorder.delivered.lock().clone();
        delivered.sort_by(|a, b| a.to[0].email.cmp(&b.to[0].email));
        assert_eq!(delivered[0].subject, "Hola Feria");
        assert_eq!(delivered[0].text_body.as_deref(), Some("Estimado Estimado/a"));
        assert_eq!(delivered[1].subject, "Hola Acme Corp");
        assert_eq!(delivered[1].text_body.as_deref(), Some("Estimado Laura"));
    }

    #[tokio::test]
    async fn test_send_keeps_recipient_order_in_outcomes() {
        let sender = CampaignSender::new(Recorder {
            failing: vec!["hr@acme.test"],
            ..Default::default()
        });

        let report = sender.send(&draft(), &recipients()).await.unwrap();
        let emails: Vec<&str> = report.outcomes().iter().map(|o| o.recipient.email()).collect();
        assert_eq!(emails, ["hr@acme.test", "feria@example.org"]);
        assert!(!report.outcomes()[0].is_success());
        assert_eq!(report.errors(), ["hr@acme.test: Send error: mailbox unavailable"]);
    }

    #[tokio::test]
    async fn test_invalid_draft_dispatches_nothing() {
        let recorder = Arc::new(Recorder::default());
        let sender = CampaignSender::from_arc(recorder.clone());

        let err = sender
            .send(&draft().with_body(""), &recipients())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(recorder.delivered.lock().is_empty());
    }
}
