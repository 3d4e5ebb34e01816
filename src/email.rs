//! Outgoing email handed to a mail transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::address::{Address, ToAddress};

/// One outgoing message.
///
/// The campaign sender builds one `Email` per recipient from a
/// [`RenderedMessage`](crate::RenderedMessage); transports only see this type.
///
/// ```
/// use campaigner::Email;
///
/// let email = Email::new()
///     .from(("Placement Office", "placements@uni.example.edu"))
///     .to(("Acme Corp", "hr@acme.test"))
///     .subject("Hola Acme Corp")
///     .text_body("Estimado/a, ...");
///
/// assert_eq!(email.to[0].email, "hr@acme.test");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    /// Sender address
    pub from: Option<Address>,
    /// Recipients
    pub to: Vec<Address>,
    /// Reply-to addresses
    pub reply_to: Vec<Address>,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text_body: Option<String>,
    /// HTML body
    pub html_body: Option<String>,
    /// Custom email headers
    pub headers: HashMap<String, String>,
    /// Private storage for transports (e.g. the time a local copy was stored).
    pub private: HashMap<String, serde_json::Value>,
}

impl Email {
    /// Create a new empty email.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address.
    pub fn from(mut self, addr: impl ToAddress) -> Self {
        self.from = Some(addr.to_address());
        self
    }

    /// Add a recipient.
    pub fn to(mut self, addr: impl ToAddress) -> Self {
        self.to.push(addr.to_address());
        self
    }

    /// Add a reply-to address.
    pub fn reply_to(mut self, addr: impl ToAddress) -> Self {
        self.reply_to.push(addr.to_address());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the plain text body.
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The body as the recipient will read it, HTML preferred.
    pub fn body(&self) -> Option<&str> {
        self.html_body.as_deref().or(self.text_body.as_deref())
    }

    /// Check if the email has all required fields for sending.
    pub fn is_valid(&self) -> bool {
        self.from.is_some() && !self.to.is_empty()
    }
}
