//! Campaign recipients: registered companies and hand-typed addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{Address, ToAddress};

/// Opaque identifier of a company record in the recipient directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CompanyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A recipient backed by a registered company.
///
/// `industry` and `state` are only shown in the selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecipient {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl DirectoryRecipient {
    pub fn new(
        id: impl Into<CompanyId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            contact_name: None,
            industry: None,
            state: None,
        }
    }

    pub fn contact_name(mut self, contact: impl Into<String>) -> Self {
        self.contact_name = Some(contact.into());
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Case-insensitive free-text match over name, email and industry.
    ///
    /// An empty or blank needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self
                .industry
                .as_ref()
                .is_some_and(|i| i.to_lowercase().contains(&needle))
    }
}

/// A hand-typed destination, not backed by any stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocRecipient {
    pub name: String,
    pub email: String,
}

impl AdHocRecipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Which list a recipient came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    Directory,
    AdHoc,
}

/// A message destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipient {
    Directory(DirectoryRecipient),
    AdHoc(AdHocRecipient),
}

impl Recipient {
    pub fn email(&self) -> &str {
        match self {
            Recipient::Directory(r) => &r.email,
            Recipient::AdHoc(r) => &r.email,
        }
    }

    /// Company name for directory entries, the typed name for ad-hoc ones.
    ///
    /// A blank name falls back to the email address.
    pub fn display_name(&self) -> &str {
        let name = self.name().trim();
        if name.is_empty() {
            self.email()
        } else {
            name
        }
    }

    fn name(&self) -> &str {
        match self {
            Recipient::Directory(r) => &r.name,
            Recipient::AdHoc(r) => &r.name,
        }
    }

    /// Known contact person; ad-hoc recipients never have one.
    pub fn contact_name(&self) -> Option<&str> {
        match self {
            Recipient::Directory(r) => r
                .contact_name
                .as_deref()
                .filter(|c| !c.trim().is_empty()),
            Recipient::AdHoc(_) => None,
        }
    }

    pub fn kind(&self) -> RecipientKind {
        match self {
            Recipient::Directory(_) => RecipientKind::Directory,
            Recipient::AdHoc(_) => RecipientKind::AdHoc,
        }
    }
}

impl From<DirectoryRecipient> for Recipient {
    fn from(r: DirectoryRecipient) -> Self {
        Recipient::Directory(r)
    }
}

impl From<AdHocRecipient> for Recipient {
    fn from(r: AdHocRecipient) -> Self {
        Recipient::AdHoc(r)
    }
}

impl ToAddress for Recipient {
    fn to_address(&self) -> Address {
        let name = self.name().trim();
        if name.is_empty() {
            Address::new(self.email())
        } else {
            Address::with_name(name, self.email())
        }
    }
}
