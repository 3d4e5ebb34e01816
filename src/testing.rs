//! Assertion helpers over [`LocalMailer`].
//!
//! ```rust,ignore
//! use campaigner::providers::LocalMailer;
//! use campaigner::testing::*;
//!
//! #[tokio::test]
//! async fn invitation_reaches_every_company() {
//!     let mailer = LocalMailer::new();
//!
//!     // ... send a campaign through CampaignSender::new(mailer.clone()) ...
//!
//!     assert_email_count(&mailer, 2);
//!     assert_email_to(&mailer, "hr@acme.test");
//!     assert_email_subject(&mailer, "Hola Acme Corp");
//!     assert_email_body_matches(&mailer, r"visita https://\S+");
//! }
//! ```

use regex::Regex;

use crate::providers::LocalMailer;
use crate::storage::StoredEmail;

fn format_email_summary(emails: &[StoredEmail]) -> String {
    if emails.is_empty() {
        return "  (no emails sent)".to_string();
    }

    emails
        .iter()
        .enumerate()
        .map(|(i, stored)| {
            let e = &stored.email;
            let to = e
                .to
                .iter()
                .map(|a| a.email.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("  {}. To: [{}], Subject: \"{}\"", i + 1, to, e.subject)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid regex pattern '{}': {}", pattern, e))
}

/// Panics if no email was sent.
pub fn assert_email_sent(mailer: &LocalMailer) {
    assert!(
        mailer.has_emails(),
        "Expected at least one email to be sent, but none were sent"
    );
}

/// Panics if any email was sent.
pub fn assert_no_emails_sent(mailer: &LocalMailer) {
    let emails = mailer.emails();
    assert!(
        emails.is_empty(),
        "Expected no emails to be sent, but {} were sent.\n\nEmails sent:\n{}",
        emails.len(),
        format_email_summary(&emails)
    );
}

/// Alias of [`assert_no_emails_sent`].
pub fn refute_email_sent(mailer: &LocalMailer) {
    assert_no_emails_sent(mailer)
}

/// Panics unless exactly `expected` emails were sent.
pub fn assert_email_count(mailer: &LocalMailer, expected: usize) {
    let emails = mailer.emails();
    assert!(
        emails.len() == expected,
        "Expected {} email(s) to be sent, but {} were sent.\n\nEmails sent:\n{}",
        expected,
        emails.len(),
        format_email_summary(&emails)
    );
}

/// Panics unless an email went to `email` (ignoring case).
pub fn assert_email_to(mailer: &LocalMailer, email: &str) {
    let emails = mailer.emails();
    assert!(
        mailer.sent_to(email),
        "Expected an email to be sent to '{}'.\n\nEmails sent:\n{}",
        email,
        format_email_summary(&emails)
    );
}

/// Panics if an email went to `email`.
pub fn assert_no_emails_to(mailer: &LocalMailer, email: &str) {
    let emails = mailer.emails();
    assert!(
        !mailer.sent_to(email),
        "Expected no email to be sent to '{}', but found one.\n\nEmails sent:\n{}",
        email,
        format_email_summary(&emails)
    );
}

/// Panics unless an email has exactly this subject.
pub fn assert_email_subject(mailer: &LocalMailer, subject: &str) {
    let emails = mailer.emails();
    assert!(
        emails.iter().any(|s| s.email.subject == subject),
        "Expected an email with subject '{}'.\n\nEmails sent:\n{}",
        subject,
        format_email_summary(&emails)
    );
}

/// Panics unless some email body (HTML or text) contains `text`.
pub fn assert_email_body_contains(mailer: &LocalMailer, text: &str) {
    let emails = mailer.emails();
    assert!(
        emails
            .iter()
            .any(|s| s.email.body().is_some_and(|b| b.contains(text))),
        "Expected an email body containing '{}'.\n\nEmails sent:\n{}",
        text,
        format_email_summary(&emails)
    );
}

/// Panics unless some email body matches the regex `pattern`.
pub fn assert_email_body_matches(mailer: &LocalMailer, pattern: &str) {
    let re = compile(pattern);
    let emails = mailer.emails();
    assert!(
        emails
            .iter()
            .any(|s| s.email.body().is_some_and(|b| re.is_match(b))),
        "Expected an email body matching /{}/.\n\nEmails sent:\n{}",
        pattern,
        format_email_summary(&emails)
    );
}

/// The email most recently sent to `email`.
///
/// Panics if there is none.
pub fn last_email_to(mailer: &LocalMailer, email: &str) -> StoredEmail {
    mailer
        .emails()
        .into_iter()
        .find(|s| s.email.to.iter().any(|a| a.same_email(email)))
        .unwrap_or_else(|| {
            panic!(
                "Expected an email to be sent to '{}'.\n\nEmails sent:\n{}",
                email,
                format_email_summary(&mailer.emails())
            )
        })
}
