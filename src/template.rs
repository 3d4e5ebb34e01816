//! Reusable message skeletons with `{{variable}}` placeholders.

use serde::{Deserialize, Deserializer, Serialize};

/// Format a placeholder token: `placeholder("portalUrl") == "{{portalUrl}}"`.
pub fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// A named message skeleton.
///
/// Templates come from a [`TemplateCatalog`](crate::TemplateCatalog) and are
/// never modified by the sender. `variables` lists the placeholder names the
/// coordinator is asked to fill; names are unique and keep their order.
///
/// ```
/// use campaigner::Template;
///
/// let template = Template::new("invitation", "Invitation")
///     .subject("Hola {{companyName}}")
///     .body("Estimado {{contactName}}, visita {{portalUrl}}")
///     .variable("portalUrl")
///     .variable("portalUrl");
///
/// assert_eq!(template.variables(), ["portalUrl"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub subject: String,
    pub body: String,
    #[serde(default, deserialize_with = "unique_names")]
    variables: Vec<String>,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            subject: String::new(),
            body: String::new(),
            variables: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Declare a variable. Declaring the same name twice is a no-op.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.variables.contains(&name) {
            self.variables.push(name);
        }
        self
    }

    /// Declared variable names, in declaration order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn declares(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }
}

fn unique_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut names = Vec::with_capacity(raw.len());
    for name in raw {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
