//! Placeholder substitution.
//!
//! Rendering is an ordered list of [`RenderPass`]es, each an ordered list of
//! `(pattern, value)` substitutions applied left to right over the raw text.
//! A draft is rendered for one recipient with two passes:
//!
//! 1. template variables: every variable declared by the chosen template,
//!    `{{name}}` becomes the supplied value or the visible marker `[name]`;
//! 2. recipient fields: `{{companyName}}` and `{{contactName}}`.
//!
//! Replacement is global and textual. Placeholders no pass knows about are
//! left in the output untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::draft::Draft;
use crate::recipient::Recipient;
use crate::template::{placeholder, Template};

/// Recipient field holding the company (or ad-hoc display) name.
pub const COMPANY_NAME: &str = "companyName";
/// Recipient field holding the contact person.
pub const CONTACT_NAME: &str = "contactName";
/// Greeting used for `{{contactName}}` when no contact is known.
pub const DEFAULT_CONTACT_NAME: &str = "Estimado/a";

/// A message bound to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// One `pattern -> value` replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub pattern: String,
    pub value: String,
}

/// An ordered group of substitutions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPass {
    substitutions: Vec<Substitution>,
}

impl RenderPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every occurrence of `pattern` with `value`.
    pub fn substitute(mut self, pattern: impl Into<String>, value: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !pattern.is_empty() {
            self.substitutions.push(Substitution {
                pattern,
                value: value.into(),
            });
        }
        self
    }

    /// Template-variable pass.
    ///
    /// Only names declared by `template` are substituted. A missing or empty
    /// value renders as `[name]`. Without a template the pass is empty.
    pub fn template_variables(
        template: Option<&Template>,
        values: &BTreeMap<String, String>,
    ) -> Self {
        let Some(template) = template else {
            return Self::new();
        };

        template
            .variables()
            .iter()
            .fold(Self::new(), |pass, name| {
                let value = match values.get(name) {
                    Some(value) if !value.is_empty() => value.clone(),
                    _ => format!("[{}]", name),
                };
                pass.substitute(placeholder(name), value)
            })
    }

    /// Recipient-field pass.
    pub fn recipient_fields(recipient: &Recipient) -> Self {
        Self::new()
            .substitute(placeholder(COMPANY_NAME), recipient.display_name())
            .substitute(
                placeholder(CONTACT_NAME),
                recipient.contact_name().unwrap_or(DEFAULT_CONTACT_NAME),
            )
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.substitutions
            .iter()
            .fold(text.to_string(), |acc, s| acc.replace(&s.pattern, &s.value))
    }
}

/// Passes evaluated in order.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    passes: Vec<RenderPass>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(mut self, pass: RenderPass) -> Self {
        self.passes.push(pass);
        self
    }

    /// Template variables first, then recipient fields.
    pub fn for_recipient(draft: &Draft, recipient: &Recipient) -> Self {
        Self::new()
            .pass(RenderPass::template_variables(
                draft.template(),
                draft.variables(),
            ))
            .pass(RenderPass::recipient_fields(recipient))
    }

    pub fn render_text(&self, text: &str) -> String {
        self.passes
            .iter()
            .fold(text.to_string(), |acc, pass| pass.apply(&acc))
    }

    pub fn render(&self, subject: &str, body: &str) -> RenderedMessage {
        RenderedMessage {
            subject: self.render_text(subject),
            body: self.render_text(body),
        }
    }
}

/// Bind `draft` to `recipient`. Pure: no I/O, the draft is not touched.
pub fn render_message(draft: &Draft, recipient: &Recipient) -> RenderedMessage {
    Renderer::for_recipient(draft, recipient).render(draft.subject(), draft.body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipient::{AdHocRecipient, DirectoryRecipient};

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_is_global() {
        let pass = RenderPass::new().substitute("{{x}}", "1");
        assert_eq!(pass.apply("{{x}} + {{x}} = {{y}}"), "1 + 1 = {{y}}");
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        let pass = RenderPass::new().substitute("", "boom");
        assert!(pass.is_empty());
        assert_eq!(pass.apply("abc"), "abc");
    }

    #[test]
    fn test_template_variables_unset_and_empty_become_markers() {
        let template = Template::new("t", "T")
            .variable("date")
            .variable("place")
            .variable("room");
        let pass = RenderPass::template_variables(
            Some(&template),
            &values(&[("date", "12 May"), ("room", "")]),
        );

        assert_eq!(
            pass.apply("{{date}} / {{place}} / {{room}}"),
            "12 May / [place] / [room]"
        );
    }

    #[test]
    fn test_template_variables_ignore_undeclared_values() {
        let template = Template::new("t", "T").variable("date");
        let pass = RenderPass::template_variables(
            Some(&template),
            &values(&[("date", "today"), ("extra", "nope")]),
        );

        assert_eq!(pass.substitutions().len(), 1);
        assert_eq!(pass.apply("{{date}} {{extra}}"), "today {{extra}}");
    }

    #[test]
    fn test_no_template_is_noop() {
        let pass = RenderPass::template_variables(None, &values(&[("date", "today")]));
        assert!(pass.is_empty());
        assert_eq!(pass.apply("{{date}}"), "{{date}}");
    }

    #[test]
    fn test_recipient_fields_with_contact() {
        let recipient = Recipient::from(
            DirectoryRecipient::new("c-1", "Acme Corp", "hr@acme.test").contact_name("Laura"),
        );
        let pass = RenderPass::recipient_fields(&recipient);
        assert_eq!(
            pass.apply("{{companyName}}: hola {{contactName}}, {{contactName}}"),
            "Acme Corp: hola Laura, Laura"
        );
    }

    #[test]
    fn test_recipient_fields_default_contact() {
        let recipient = Recipient::from(AdHocRecipient::new("Feria", "feria@example.org"));
        let pass = RenderPass::recipient_fields(&recipient);
        assert_eq!(pass.apply("{{contactName}}"), DEFAULT_CONTACT_NAME);
    }

    #[test]
    fn test_renderer_runs_passes_in_order() {
        let renderer = Renderer::new()
            .pass(RenderPass::new().substitute("{{a}}", "{{b}}"))
            .pass(RenderPass::new().substitute("{{b}}", "done"));
        assert_eq!(renderer.render_text("{{a}}"), "done");

        let reversed = Renderer::new()
            .pass(RenderPass::new().substitute("{{b}}", "done"))
            .pass(RenderPass::new().substitute("{{a}}", "{{b}}"));
        assert_eq!(reversed.render_text("{{a}}"), "{{b}}");
    }
}
