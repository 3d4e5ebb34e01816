//! SMTP transport using lettre.
//!
//! ```rust,ignore
//! use campaigner::providers::SmtpMailer;
//!
//! let mailer = SmtpMailer::new("smtp.uni.example.edu", 587)
//!     .credentials("placements", "secret")
//!     .build();
//!
//! // Local relay, no TLS, no auth
//! let mailer = SmtpMailer::localhost();
//! ```

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::address::Address;
use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};

/// SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builder with STARTTLS (port 587 style).
    pub fn new(host: &str, port: u16) -> SmtpBuilder {
        SmtpBuilder {
            host: host.to_string(),
            port,
            credentials: None,
            tls: TlsMode::StartTls,
        }
    }

    /// Plain relay on localhost:25.
    pub fn localhost() -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost")
            .port(25)
            .build();

        Self { transport }
    }

    fn build_message(&self, email: &Email) -> Result<Message, MailError> {
        let from = email
            .from
            .as_ref()
            .ok_or(MailError::MissingField("from"))?;

        if email.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }

        let mut builder = Message::builder()
            .from(address_to_mailbox(from)?)
            .subject(&email.subject);

        for to in &email.to {
            builder = builder.to(address_to_mailbox(to)?);
        }
        if let Some(reply_to) = email.reply_to.first() {
            builder = builder.reply_to(address_to_mailbox(reply_to)?);
        }

        let message = match (&email.html_body, &email.text_body) {
            (Some(html), Some(text)) => {
                builder.multipart(MultiPart::alternative_plain_html(text.clone(), html.clone()))?
            }
            (Some(html), None) => builder.header(ContentType::TEXT_HTML).body(html.clone())?,
            (None, Some(text)) => builder.header(ContentType::TEXT_PLAIN).body(text.clone())?,
            (None, None) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(String::new())?,
        };

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        let message = self.build_message(email)?;

        let response = self.transport.send(message).await?;

        // The server's first response line usually carries the queue id.
        let message_id = response
            .message()
            .next()
            .and_then(|m| m.lines().next())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}

/// TLS mode for the SMTP connection.
#[derive(Debug, Clone, Copy)]
pub enum TlsMode {
    /// No TLS, only for localhost
    None,
    /// Upgrade to TLS after connecting (port 587)
    StartTls,
    /// TLS from the start (port 465)
    Tls,
}

/// Builder for [`SmtpMailer`].
pub struct SmtpBuilder {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    tls: TlsMode,
}

impl SmtpBuilder {
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    pub fn tls(mut self, mode: TlsMode) -> Self {
        self.tls = mode;
        self
    }

    pub fn no_tls(self) -> Self {
        self.tls(TlsMode::None)
    }

    pub fn build(self) -> SmtpMailer {
        let builder = match self.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .unwrap_or_else(|_| {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
                }),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .unwrap_or_else(|_| {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
                }),
        };

        let mut builder = builder.port(self.port);
        if let Some(creds) = self.credentials {
            builder = builder.credentials(creds);
        }

        SmtpMailer {
            transport: builder.build(),
        }
    }
}

fn address_to_mailbox(addr: &Address) -> Result<Mailbox, MailError> {
    let email: lettre::Address = addr.email.parse()?;
    Ok(Mailbox::new(addr.name.clone(), email))
}
