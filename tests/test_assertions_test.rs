//! Assertion helper tests.

#![cfg(feature = "local")]

use campaigner::providers::LocalMailer;
use campaigner::testing::*;
use campaigner::{CampaignSender, DirectoryRecipient, Draft, SenderConfig};

// ============================================================================
// Helper Functions
// ============================================================================

async fn send_campaign(mailer: &LocalMailer) {
    let draft = Draft::new()
        .with_subject("Hola {{companyName}}")
        .with_body("Estimado {{contactName}}, visita https://jobs.example.edu")
        .toggle_company(DirectoryRecipient::new("1", "Acme Corp", "hr@acme.test").contact_name("Ana"))
        .add_ad_hoc_recipient("Feria", "feria@example.org")
        .unwrap();

    CampaignSender::new(mailer.clone())
        .with_config(SenderConfig::default().from("placements@uni.example.edu"))
        .send_draft(&draft)
        .await
        .unwrap();
}

// ============================================================================
// assert_email_sent / assert_no_emails_sent
// ============================================================================

#[tokio::test]
async fn assert_email_sent_passes_when_email_sent() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_sent(&mailer);
}

#[tokio::test]
#[should_panic(expected = "Expected at least one email")]
async fn assert_email_sent_fails_when_no_email_sent() {
    let mailer = LocalMailer::new();
    assert_email_sent(&mailer);
}

#[tokio::test]
async fn assert_no_emails_sent_passes_when_nothing_sent() {
    let mailer = LocalMailer::new();
    assert_no_emails_sent(&mailer);
    refute_email_sent(&mailer);
}

#[tokio::test]
#[should_panic(expected = "Expected no emails to be sent, but 2 were sent")]
async fn assert_no_emails_sent_fails_after_campaign() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_no_emails_sent(&mailer);
}

// ============================================================================
// Counts and recipients
// ============================================================================

#[tokio::test]
async fn assert_email_count_matches() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_count(&mailer, 2);
}

#[tokio::test]
#[should_panic(expected = "Expected 3 email(s) to be sent")]
async fn assert_email_count_fails_on_mismatch() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_count(&mailer, 3);
}

#[tokio::test]
async fn assert_email_to_ignores_case() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_to(&mailer, "HR@acme.test");
    assert_no_emails_to(&mailer, "jobs@globex.test");
}

#[tokio::test]
#[should_panic(expected = "Expected an email to be sent to 'jobs@globex.test'")]
async fn assert_email_to_fails_for_missing_recipient() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_to(&mailer, "jobs@globex.test");
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn content_assertions_see_rendered_messages() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;

    assert_email_subject(&mailer, "Hola Acme Corp");
    assert_email_subject(&mailer, "Hola Feria");
    assert_email_body_contains(&mailer, "Estimado Ana");
    assert_email_body_matches(&mailer, r"visita https://\S+");
}

#[tokio::test]
#[should_panic(expected = "Expected an email with subject 'Hola {{companyName}}'")]
async fn unrendered_subject_is_never_sent() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;
    assert_email_subject(&mailer, "Hola {{companyName}}");
}

#[tokio::test]
async fn last_email_to_returns_the_message() {
    let mailer = LocalMailer::new();
    send_campaign(&mailer).await;

    let stored = last_email_to(&mailer, "feria@example.org");
    assert_eq!(
        stored.email.text_body.as_deref(),
        Some("Estimado Estimado/a, visita https://jobs.example.edu")
    );
}
