//! The campaign being composed.
//!
//! A [`Draft`] is a plain value owned by the caller. Every edit returns a new
//! draft and leaves the old one untouched, so a UI can keep history or throw
//! the whole thing away when the composer closes. Nothing here does I/O.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::CampaignError;
use crate::recipient::{AdHocRecipient, CompanyId, DirectoryRecipient, Recipient};
use crate::template::Template;

/// Campaign-in-progress.
///
/// ```
/// use campaigner::{Draft, DirectoryRecipient, Template};
///
/// let template = Template::new("invitation", "Invitation")
///     .subject("Hola {{companyName}}")
///     .body("Visita {{portalUrl}}")
///     .variable("portalUrl");
///
/// let draft = Draft::new()
///     .select_template(Some(&template))
///     .set_variable("portalUrl", "https://jobs.example.edu")
///     .toggle_company(DirectoryRecipient::new("c-1", "Acme Corp", "hr@acme.test"))
///     .add_ad_hoc_recipient("Feria", "feria@example.org")
///     .unwrap();
///
/// assert_eq!(draft.subject(), "Hola {{companyName}}");
/// assert_eq!(draft.recipients().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    template: Option<Template>,
    variables: BTreeMap<String, String>,
    subject: String,
    body: String,
    companies: Vec<DirectoryRecipient>,
    ad_hoc: Vec<AdHocRecipient>,
}

impl Draft {
    /// An empty draft with no template: subject and body are free text.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Selected directory recipients, in selection order.
    pub fn companies(&self) -> &[DirectoryRecipient] {
        &self.companies
    }

    pub fn ad_hoc_recipients(&self) -> &[AdHocRecipient] {
        &self.ad_hoc
    }

    pub fn is_company_selected(&self, id: &CompanyId) -> bool {
        self.companies.iter().any(|c| &c.id == id)
    }

    /// Choose a template, or `None` to author subject and body freely.
    ///
    /// Choosing a template copies its subject and body into the draft and
    /// resets the variable values to the names it declares, all empty.
    /// Clearing keeps the current subject and body and drops the values.
    pub fn select_template(&self, template: Option<&Template>) -> Self {
        let mut next = self.clone();
        match template {
            Some(template) => {
                next.subject = template.subject.clone();
                next.body = template.body.clone();
                next.variables = template
                    .variables()
                    .iter()
                    .map(|name| (name.clone(), String::new()))
                    .collect();
                next.template = Some(template.clone());
            }
            None => {
                next.template = None;
                next.variables.clear();
            }
        }
        next
    }

    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.variables.insert(name.into(), value.into());
        next
    }

    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.subject = subject.into();
        next
    }

    pub fn with_body(&self, body: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.body = body.into();
        next
    }

    /// Select the company if it is not selected yet, deselect it otherwise.
    pub fn toggle_company(&self, company: DirectoryRecipient) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.companies.iter().position(|c| c.id == company.id) {
            next.companies.remove(pos);
        } else {
            next.companies.push(company);
        }
        next
    }

    /// Select every company in `companies` (e.g. a filtered list), keeping
    /// the ones already selected.
    pub fn select_companies<I>(&self, companies: I) -> Self
    where
        I: IntoIterator<Item = DirectoryRecipient>,
    {
        let mut next = self.clone();
        for company in companies {
            if !next.is_company_selected(&company.id) {
                next.companies.push(company);
            }
        }
        next
    }

    pub fn clear_companies(&self) -> Self {
        let mut next = self.clone();
        next.companies.clear();
        next
    }

    /// Add a hand-typed recipient.
    ///
    /// Fails with [`CampaignError::InvalidAddress`] when `email` does not look
    /// like an address and with [`CampaignError::DuplicateRecipient`] when the
    /// same address (ignoring case) was already added by hand. Addresses of
    /// selected companies are not checked. A blank name is kept; such a
    /// recipient is addressed by its email (see [`Recipient::display_name`]).
    pub fn add_ad_hoc_recipient(&self, name: &str, email: &str) -> Result<Self, CampaignError> {
        let address = Address::parse(email)?;
        if self.ad_hoc.iter().any(|r| address.same_email(&r.email)) {
            return Err(CampaignError::DuplicateRecipient(address.email));
        }

        let mut next = self.clone();
        next.ad_hoc
            .push(AdHocRecipient::new(name.trim(), address.email));
        Ok(next)
    }

    /// Remove a hand-typed recipient by address. Unknown addresses are ignored.
    pub fn remove_ad_hoc_recipient(&self, email: &str) -> Self {
        let mut next = self.clone();
        next.ad_hoc
            .retain(|r| !r.email.eq_ignore_ascii_case(email.trim()));
        next
    }

    /// Selected companies followed by the hand-typed recipients.
    ///
    /// An address present in both lists appears twice and will be sent twice;
    /// see [`Draft::duplicate_addresses`].
    pub fn recipients(&self) -> Vec<Recipient> {
        self.companies
            .iter()
            .cloned()
            .map(Recipient::Directory)
            .chain(self.ad_hoc.iter().cloned().map(Recipient::AdHoc))
            .collect()
    }

    pub fn recipient_count(&self) -> usize {
        self.companies.len() + self.ad_hoc.len()
    }

    /// Addresses that are both a selected company and a hand-typed recipient.
    pub fn duplicate_addresses(&self) -> Vec<String> {
        self.ad_hoc
            .iter()
            .filter(|r| {
                self.companies
                    .iter()
                    .any(|c| c.email.eq_ignore_ascii_case(&r.email))
            })
            .map(|r| r.email.clone())
            .collect()
    }
}
