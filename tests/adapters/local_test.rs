//! Local transport tests.

use campaigner::providers::LocalMailer;
use campaigner::{CampaignSender, DirectoryRecipient, Draft, Email, Mailer, SenderConfig};

fn email_to(to: &str) -> Email {
    Email::new()
        .from("placements@uni.example.edu")
        .to(to)
        .subject("Hola")
        .text_body("Estimado/a")
}

// ============================================================================
// Storage
// ============================================================================

#[tokio::test]
async fn captures_sent_emails() {
    let mailer = LocalMailer::new();
    mailer.deliver(&email_to("hr@acme.test")).await.unwrap();

    assert!(mailer.has_emails());
    assert_eq!(mailer.email_count(), 1);
    let last = mailer.last_email().unwrap();
    assert_eq!(last.email.subject, "Hola");
    assert_eq!(last.email.to[0].email, "hr@acme.test");
}

#[tokio::test]
async fn clones_share_storage() {
    let mailer = LocalMailer::new();
    let handle = mailer.clone();

    mailer.deliver(&email_to("hr@acme.test")).await.unwrap();
    assert_eq!(handle.email_count(), 1);
}

#[tokio::test]
async fn flush_returns_and_clears() {
    let mailer = LocalMailer::new();
    mailer.deliver(&email_to("a@acme.test")).await.unwrap();
    mailer.deliver(&email_to("b@acme.test")).await.unwrap();

    let flushed = mailer.flush();
    assert_eq!(flushed.len(), 2);
    assert!(!mailer.has_emails());
}

#[tokio::test]
async fn find_emails_filters_by_predicate() {
    let mailer = LocalMailer::new();
    mailer.deliver(&email_to("a@acme.test")).await.unwrap();
    mailer.deliver(&email_to("b@globex.test")).await.unwrap();

    let found = mailer.find_emails(|e| e.to.iter().any(|a| a.email.ends_with("globex.test")));
    assert_eq!(found.len(), 1);
}

// ============================================================================
// Failure injection
// ============================================================================

#[tokio::test]
async fn set_failure_fails_every_delivery() {
    let mailer = LocalMailer::new();
    mailer.set_failure("relay down");

    let err = mailer.deliver(&email_to("hr@acme.test")).await.unwrap_err();
    assert_eq!(err.to_string(), "Send error: relay down");
    assert_eq!(mailer.email_count(), 0);

    mailer.clear_failure();
    assert!(mailer.deliver(&email_to("hr@acme.test")).await.is_ok());
}

#[tokio::test]
async fn campaign_with_one_bouncing_address() {
    let mailer = LocalMailer::new();
    mailer.fail_for("bounce@globex.test", "mailbox does not exist");

    let draft = Draft::new()
        .with_subject("Hola {{companyName}}")
        .with_body("Estimado {{contactName}}")
        .toggle_company(DirectoryRecipient::new("1", "Acme Corp", "hr@acme.test"))
        .toggle_company(DirectoryRecipient::new("2", "Globex", "bounce@globex.test"))
        .toggle_company(DirectoryRecipient::new("3", "Initech", "jobs@initech.test"));

    let sender = CampaignSender::new(mailer.clone())
        .with_config(SenderConfig::default().from("placements@uni.example.edu"));
    let report = sender.send_draft(&draft).await.unwrap();

    assert_eq!(report.sent(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.errors(),
        ["bounce@globex.test: Send error: mailbox does not exist"]
    );
    assert_eq!(mailer.email_count(), 2);
    assert!(mailer.sent_to("hr@acme.test"));
    assert!(!mailer.sent_to("bounce@globex.test"));
}
