//! Resend transport tests.

use std::time::Duration;

use campaigner::providers::ResendMailer;
use campaigner::{
    CampaignSender, DirectoryRecipient, Draft, Email, MailError, Mailer, RetryExt, RetryPolicy,
    SenderConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn valid_email() -> Email {
    Email::new()
        .from("placements@uni.example.edu")
        .to("hr@acme.test")
        .subject("Hola Acme Corp")
        .text_body("Estimado/a")
}

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "049b9217-30b5-4f61-a8e3-4d2d12f9f5a7"
    }))
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test]
async fn successful_delivery_returns_ok() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("Authorization", "Bearer re_123456789"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "from": "placements@uni.example.edu",
            "to": ["hr@acme.test"],
            "subject": "Hola Acme Corp",
            "text": "Estimado/a"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let delivery = mailer.deliver(&valid_email()).await.unwrap();
    assert_eq!(delivery.message_id, "049b9217-30b5-4f61-a8e3-4d2d12f9f5a7");
}

#[tokio::test]
async fn delivery_with_reply_to_and_headers() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    let email = valid_email()
        .reply_to("coordinator@uni.example.edu")
        .header("X-Entity-Ref-ID", "spring-fair");

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({
            "reply_to": "coordinator@uni.example.edu",
            "headers": { "X-Entity-Ref-ID": "spring-fair" }
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    assert!(mailer.deliver(&email).await.is_ok());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn deliver_with_400_response() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": "Invalid `to` field",
            "name": "validation_error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer.deliver(&valid_email()).await.unwrap_err();
    assert!(err.to_string().contains("Invalid `to` field"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn deliver_with_429_response_is_transient() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "statusCode": 429,
            "message": "Too many requests",
            "name": "rate_limit_exceeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer.deliver(&valid_email()).await.unwrap_err();
    assert!(err.to_string().contains("Too many requests"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn deliver_with_500_non_json_body() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer.deliver(&valid_email()).await.unwrap_err();
    assert!(matches!(
        err,
        MailError::ProviderError {
            status: Some(500),
            ..
        }
    ));
}

#[tokio::test]
async fn deliver_without_from_returns_error() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    let email = Email::new().to("hr@acme.test").subject("Hola");

    let err = mailer.deliver(&email).await.unwrap_err();
    assert!(matches!(err, MailError::MissingField("from")));
}

#[test]
fn empty_api_key_fails_validation() {
    let mailer = ResendMailer::new("  ");
    assert!(mailer.validate_config().is_err());
    assert!(ResendMailer::new("re_1").validate_config().is_ok());
}

// ============================================================================
// Retry
// ============================================================================

#[tokio::test]
async fn retry_wrapper_recovers_from_one_server_error() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789")
        .base_url(server.uri())
        .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "Service unavailable"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let delivery = mailer.deliver(&valid_email()).await.unwrap();
    assert_eq!(delivery.message_id, "049b9217-30b5-4f61-a8e3-4d2d12f9f5a7");
}

// ============================================================================
// Campaign
// ============================================================================

#[tokio::test]
async fn campaign_sends_one_request_per_recipient() {
    let server = MockServer::start().await;
    let mailer = ResendMailer::new("re_123456789").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({
            "to": ["Acme Corp <hr@acme.test>"],
            "subject": "Hola Acme Corp",
            "text": "Estimado Ana"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({
            "to": ["Feria <feria@example.org>"],
            "subject": "Hola Feria",
            "text": "Estimado Estimado/a"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let draft = Draft::new()
        .with_subject("Hola {{companyName}}")
        .with_body("Estimado {{contactName}}")
        .toggle_company(
            DirectoryRecipient::new("1", "Acme Corp", "hr@acme.test").contact_name("Ana"),
        )
        .add_ad_hoc_recipient("Feria", "feria@example.org")
        .unwrap();

    let sender = CampaignSender::new(mailer)
        .with_config(SenderConfig::default().from("placements@uni.example.edu"));
    let report = sender.send_draft(&draft).await.unwrap();

    assert_eq!(report.sent(), 2);
    assert_eq!(report.total_companies(), 1);
    assert_eq!(report.total_custom_emails(), 1);
}
