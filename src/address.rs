//! Email address type with optional display name.

use crate::error::CampaignError;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address with an optional display name.
///
/// # Examples
///
/// ```
/// use campaigner::Address;
///
/// let addr: Address = "hr@acme.test".into();
/// assert_eq!(addr.email, "hr@acme.test");
/// assert_eq!(addr.name, None);
///
/// let addr: Address = ("Acme Corp", "hr@acme.test").into();
/// assert_eq!(addr.name, Some("Acme Corp".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Optional display name (e.g., "Acme Corp")
    pub name: Option<String>,
    /// Email address (e.g., "hr@acme.test")
    pub email: String,
}

impl Address {
    /// Create a new address with just an email.
    ///
    /// Logs a warning if the email fails the basic sanity check. For strict
    /// validation, use [`Address::parse`] instead.
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email. Use Address::parse() for strict validation."
            );
        }

        Self { name: None, email }
    }

    /// Create a new address with a name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email. Use Address::parse_with_name() for strict validation."
            );
        }

        Self {
            name: Some(name.into()),
            email,
        }
    }

    /// Non-empty local part, `@`, non-empty domain.
    fn basic_sanity_check(email: &str) -> bool {
        match email.rsplit_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }

    /// Check whether `email` is a syntactically valid address.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// ```
    /// use campaigner::Address;
    ///
    /// assert!(Address::is_valid("hr@acme.test"));
    /// assert!(!Address::is_valid("hr@"));
    /// assert!(!Address::is_valid("@acme.test"));
    /// assert!(!Address::is_valid("hr acme.test"));
    /// ```
    pub fn is_valid(email: &str) -> bool {
        let email = email.trim();
        Self::basic_sanity_check(email) && EmailAddress::is_valid(email)
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse and validate an email address.
    ///
    /// ```
    /// use campaigner::Address;
    ///
    /// let addr = Address::parse(" hr@acme.test ").unwrap();
    /// assert_eq!(addr.email, "hr@acme.test");
    ///
    /// assert!(Address::parse("not-an-email").is_err());
    /// assert!(Address::parse("").is_err());
    /// ```
    pub fn parse(email: &str) -> Result<Self, CampaignError> {
        let email = email.trim();
        if !Self::is_valid(email) {
            return Err(CampaignError::InvalidAddress(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(Self {
            name: None,
            email: email.to_string(),
        })
    }

    /// Parse and validate an email address with a display name.
    ///
    /// An empty (or blank) name is dropped.
    pub fn parse_with_name(name: &str, email: &str) -> Result<Self, CampaignError> {
        let mut addr = Self::parse(email)?;
        let name = name.trim();
        if !name.is_empty() {
            addr.name = Some(name.to_string());
        }
        Ok(addr)
    }

    /// Compare the email part ignoring ASCII case.
    pub fn same_email(&self, other: &str) -> bool {
        self.email.eq_ignore_ascii_case(other.trim())
    }

    /// Format as "Name <email>" or just "email" if no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }

    /// Format according to RFC 5322, quoting and escaping the display name.
    pub fn formatted_rfc5322(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\" <{}>", escaped, self.email)
            }
            None => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Self::with_name(name, email)
    }
}

impl From<(String, String)> for Address {
    fn from((name, email): (String, String)) -> Self {
        Self::with_name(name, email)
    }
}

/// Trait for types that can be converted to an email address.
///
/// Implemented for strings, `(name, email)` tuples, [`Address`] and
/// [`Recipient`](crate::Recipient), so any of them can be passed to the
/// [`Email`](crate::Email) builder.
pub trait ToAddress {
    fn to_address(&self) -> Address;
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Address {
        (*self).to_address()
    }
}

impl ToAddress for Address {
    fn to_address(&self) -> Address {
        self.clone()
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl<N: AsRef<str>, E: AsRef<str>> ToAddress for (N, E) {
    fn to_address(&self) -> Address {
        Address::with_name(self.0.as_ref(), self.1.as_ref())
    }
}
