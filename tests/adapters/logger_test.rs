//! Logger transport tests.

use campaigner::providers::LoggerMailer;
use campaigner::{CampaignSender, Draft, Email, Mailer};

fn invitation() -> Email {
    Email::new()
        .from("placements@uni.example.edu")
        .to(("Acme Corp", "hr@acme.test"))
        .subject("Hola Acme Corp")
        .text_body("Estimado/a, visita https://jobs.example.edu")
}

#[tokio::test]
async fn deliver_returns_ok() {
    let mailer = LoggerMailer::new();

    let delivery = mailer.deliver(&invitation()).await.unwrap();
    assert!(!delivery.message_id.is_empty());
}

#[tokio::test]
async fn deliver_with_full_logging_returns_ok() {
    let mailer = LoggerMailer::full();
    assert!(mailer.deliver(&invitation()).await.is_ok());
}

#[tokio::test]
async fn message_ids_are_unique() {
    let mailer = LoggerMailer::new();
    let first = mailer.deliver(&invitation()).await.unwrap();
    let second = mailer.deliver(&invitation()).await.unwrap();
    assert_ne!(first.message_id, second.message_id);
}

#[tokio::test]
async fn campaign_through_logger_reports_every_recipient_sent() {
    let draft = Draft::new()
        .with_subject("Hola {{companyName}}")
        .with_body("Estimado {{contactName}}")
        .add_ad_hoc_recipient("Feria", "feria@example.org")
        .unwrap()
        .add_ad_hoc_recipient("Expo", "expo@example.org")
        .unwrap();

    let sender = CampaignSender::new(LoggerMailer::new());
    assert_eq!(sender.provider_name(), "logger");

    let report = sender.send_draft(&draft).await.unwrap();
    assert_eq!(report.sent(), 2);
    assert_eq!(report.failed(), 0);
    assert!(report.is_complete_success());
}
