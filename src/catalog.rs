//! Template catalog: read-only source of message templates.

use crate::error::{CampaignError, MailError};
use crate::template::Template;

/// Read-only list of templates offered in the composer.
pub trait TemplateCatalog: Send + Sync {
    fn list_templates(&self) -> Vec<Template>;

    /// Look a template up by id.
    fn find(&self, id: &str) -> Result<Template, CampaignError> {
        self.list_templates()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CampaignError::UnknownTemplate(id.to_string()))
    }
}

/// A fixed set of templates.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    templates: Vec<Template>,
}

impl StaticCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Load a JSON array of templates.
    ///
    /// ```
    /// use campaigner::{StaticCatalog, TemplateCatalog};
    ///
    /// let catalog = StaticCatalog::from_json(r#"[
    ///     {"id": "invitation", "name": "Invitation",
    ///      "subject": "Hola {{companyName}}", "body": "Visita {{portalUrl}}",
    ///      "variables": ["portalUrl"]}
    /// ]"#).unwrap();
    ///
    /// assert_eq!(catalog.find("invitation").unwrap().variables(), ["portalUrl"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, MailError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl TemplateCatalog for StaticCatalog {
    fn list_templates(&self) -> Vec<Template> {
        self.templates.clone()
    }

    fn find(&self, id: &str) -> Result<Template, CampaignError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| CampaignError::UnknownTemplate(id.to_string()))
    }
}
