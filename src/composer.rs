//! Composer session lifecycle.
//!
//! ```text
//! Composing <-> SelectingRecipients -> Previewing -> Sending -> Completed
//! ```
//!
//! Editing is possible from every state before `Sending` and throws away any
//! preview. A session sends at most once; after that it only holds the report.

use std::fmt;

use crate::draft::Draft;
use crate::error::CampaignError;
use crate::recipient::Recipient;
use crate::render::{render_message, RenderedMessage};
use crate::report::CampaignReport;
use crate::sender::{self, CampaignSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Composing,
    SelectingRecipients,
    Previewing,
    Sending,
    Completed,
}

impl ComposerState {
    fn name(self) -> &'static str {
        match self {
            Self::Composing => "composing",
            Self::SelectingRecipients => "selecting recipients",
            Self::Previewing => "previewing",
            Self::Sending => "sending",
            Self::Completed => "completed",
        }
    }

    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Sending | Self::Completed)
    }
}

impl fmt::Display for ComposerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One coordinator session around a [`Draft`].
///
/// Dropping the composer discards the draft; nothing is stored.
#[derive(Debug)]
pub struct Composer {
    state: ComposerState,
    draft: Draft,
    preview: Option<RenderedMessage>,
    report: Option<CampaignReport>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::with_draft(Draft::new())
    }

    pub fn with_draft(draft: Draft) -> Self {
        Self {
            state: ComposerState::Composing,
            draft,
            preview: None,
            report: None,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The last preview, if nothing was edited since.
    pub fn preview(&self) -> Option<&RenderedMessage> {
        self.preview.as_ref()
    }

    pub fn report(&self) -> Option<&CampaignReport> {
        self.report.as_ref()
    }

    fn ensure_editable(&self) -> Result<(), CampaignError> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(CampaignError::SessionClosed(self.state.name()))
        }
    }

    /// Edit template, variables, subject or body.
    pub fn compose<F>(&mut self, edit: F) -> Result<(), CampaignError>
    where
        F: FnOnce(&Draft) -> Draft,
    {
        self.ensure_editable()?;
        self.draft = edit(&self.draft);
        self.preview = None;
        self.state = ComposerState::Composing;
        Ok(())
    }

    /// Edit the recipient lists. A rejected edit leaves the session as it was.
    pub fn select_recipients<F>(&mut self, edit: F) -> Result<(), CampaignError>
    where
        F: FnOnce(&Draft) -> Result<Draft, CampaignError>,
    {
        self.ensure_editable()?;
        self.draft = edit(&self.draft)?;
        self.preview = None;
        self.state = ComposerState::SelectingRecipients;
        Ok(())
    }

    /// Render the draft for `sample` and keep it as the current preview.
    pub fn render_preview(&mut self, sample: &Recipient) -> Result<&RenderedMessage, CampaignError> {
        self.ensure_editable()?;
        self.state = ComposerState::Previewing;
        Ok(self.preview.insert(render_message(&self.draft, sample)))
    }

    /// Send the draft to its recipients.
    ///
    /// A failed pre-flight check keeps the session editable. Once dispatch
    /// starts the session ends in `Completed`, whatever the outcomes. If this
    /// future is dropped before it finishes, the previous state is restored.
    pub async fn send(&mut self, sender: &CampaignSender) -> Result<&CampaignReport, CampaignError> {
        self.ensure_editable()?;
        let recipients = self.draft.recipients();
        sender::validate(&self.draft, &recipients)?;

        let mut sending = SendingGuard::enter(&mut self.state);
        let report = sender.send(&self.draft, &recipients).await?;
        sending.complete();

        Ok(self.report.insert(report))
    }

    /// End the session, returning the report if it was sent.
    pub fn close(self) -> Option<CampaignReport> {
        self.report
    }
}

/// Holds the session in `Sending`; puts the previous state back unless
/// completed.
struct SendingGuard<'a> {
    state: &'a mut ComposerState,
    previous: Option<ComposerState>,
}

impl<'a> SendingGuard<'a> {
    fn enter(state: &'a mut ComposerState) -> Self {
        let previous = std::mem::replace(state, ComposerState::Sending);
        Self {
            state,
            previous: Some(previous),
        }
    }

    fn complete(&mut self) {
        self.previous = None;
        *self.state = ComposerState::Completed;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous {
            *self.state = previous;
        }
    }
}
