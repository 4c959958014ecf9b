use foundation_portal::donations::{CheckoutClient, DonationRequest};
use foundation_portal::error::PortalError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "sk_test_portal";

fn donation(amount: f64, is_recurring: bool) -> DonationRequest {
    DonationRequest {
        amount,
        donation_type: "general".to_string(),
        is_recurring,
    }
}

#[tokio::test]
async fn test_one_time_donation_creates_payment_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_portal"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains("submit_type=donate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_123",
            "url": "https://checkout.stripe.com/c/pay/cs_test_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CheckoutClient::new(&server.uri(), SECRET, "http://localhost:3000");
    let session = client.create_session(&donation(50.0, false)).await.unwrap();

    assert_eq!(session.session_id, "cs_test_123");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.stripe.com/c/pay/cs_test_123")
    );
}

#[tokio::test]
async fn test_recurring_donation_creates_monthly_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("mode=subscription"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_sub",
            "url": "https://checkout.stripe.com/c/pay/cs_test_sub"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CheckoutClient::new(&server.uri(), SECRET, "http://localhost:3000");
    let session = client.create_session(&donation(25.0, true)).await.unwrap();
    assert_eq!(session.session_id, "cs_test_sub");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("month"));
    assert!(body.contains("2500"));
    assert!(!body.contains("submit_type"));
}

#[tokio::test]
async fn test_invalid_amount_never_reaches_processor() {
    let server = MockServer::start().await;
    let client = CheckoutClient::new(&server.uri(), SECRET, "http://localhost:3000");

    for amount in [0.0, -5.0, 0.5, 250_000.0, f64::NAN] {
        let err = client.create_session(&donation(amount, false)).await.unwrap_err();
        assert!(matches!(err, PortalError::ValidationError(_)), "amount {}", amount);
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_processor_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "message": "Invalid API Key provided" }
        })))
        .mount(&server)
        .await;

    let client = CheckoutClient::new(&server.uri(), SECRET, "http://localhost:3000");
    match client.create_session(&donation(100.0, false)).await {
        Err(PortalError::PaymentError(message)) => assert_eq!(message, "Invalid API Key provided"),
        other => panic!("expected PaymentError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_secret_key_is_payment_error() {
    let server = MockServer::start().await;
    let client = CheckoutClient::new(&server.uri(), "", "http://localhost:3000");

    let err = client.create_session(&donation(100.0, false)).await.unwrap_err();
    assert!(matches!(err, PortalError::PaymentError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
