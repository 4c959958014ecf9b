use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use foundation_portal::api::create_router;
use foundation_portal::applications::ApplicationType;
use foundation_portal::auth::Role;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

mod common;
use common::*;

async fn setup() -> (Router, TempDir) {
    let db = setup_test_db().await;
    create_user(&db, "sam@foundation.org", "Sam Staff", Role::Staff).await;
    create_user(&db, "chair@foundation.org", "Chris Chair", Role::Board).await;
    create_volunteer(&db, "ann@example.org", "Ann Helper").await;

    let dir = TempDir::new().unwrap();
    let router = create_router(test_state(&db, dir.path()));
    (router, dir)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(router: &Router, surface: &str, email: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            &format!("/api/auth/{}/login", surface),
            None,
            json!({ "email": email, "password": TEST_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (router, _dir) = setup().await;
    let (status, body) = send(&router, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_programs_list_all_four() {
    let (router, _dir) = setup().await;
    let (status, body) = send(&router, get("/api/programs", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["application_type"], "fun_grant");
}

#[tokio::test]
async fn test_submitted_application_reaches_staff_dashboard() {
    let (router, _dir) = setup().await;

    let form = serde_json::to_value(valid_form(ApplicationType::FunGrant)).unwrap();
    let (status, body) = send(&router, json_request("POST", "/api/applications", None, form)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_i64().unwrap();

    let token = login(&router, "staff", "sam@foundation.org").await;
    let (status, body) = send(&router, get("/api/staff/applications?status=pending", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id);
    assert_eq!(rows[0]["application_type"], "fun_grant");

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/api/staff/applications/{}/votes", id),
            Some(&token),
            json!({ "vote": "approve" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tally"]["counts"]["approve"], 1);
    assert_eq!(body["tally"]["counts"]["deny"], 0);
}

#[tokio::test]
async fn test_invalid_application_reports_fields() {
    let (router, _dir) = setup().await;

    let mut form = valid_form(ApplicationType::SelfCare);
    form.requested_amount = Some(5000);
    let (status, body) = send(
        &router,
        json_request("POST", "/api/applications", None, serde_json::to_value(form).unwrap()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "requested_amount");
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let (router, _dir) = setup().await;

    let mut form = serde_json::to_value(valid_form(ApplicationType::FunGrant)).unwrap();
    form["child_age"] = json!("9");
    let (status, body) = send(&router, json_request("POST", "/api/applications", None, form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("child_age"), "{}", body);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/staff/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert!(status.is_client_error());
    assert!(body["error"].is_string(), "{}", body);
}

#[tokio::test]
async fn test_dashboards_require_sign_in() {
    let (router, _dir) = setup().await;

    for uri in ["/api/staff/applications", "/api/board/meetings", "/api/volunteer/opportunities"] {
        let (status, _) = send(&router, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = send(&router, get("/api/staff/applications", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roles_gate_dashboards() {
    let (router, _dir) = setup().await;
    let volunteer = login(&router, "volunteer", "ann@example.org").await;
    let staff = login(&router, "staff", "sam@foundation.org").await;
    let board = login(&router, "staff", "chair@foundation.org").await;

    let (status, _) = send(&router, get("/api/staff/applications", Some(&volunteer))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, get("/api/board/meetings", Some(&staff))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, get("/api/board/meetings", Some(&board))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, get("/api/volunteer/opportunities", Some(&staff))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, get("/api/volunteer/opportunities", Some(&volunteer))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_volunteer_rsvp_through_api() {
    let (router, _dir) = setup().await;
    let staff = login(&router, "staff", "sam@foundation.org").await;
    let volunteer = login(&router, "volunteer", "ann@example.org").await;

    let (status, opportunity) = send(
        &router,
        json_request(
            "POST",
            "/api/admin/opportunities",
            Some(&staff),
            json!({
                "title": "Park cleanup",
                "description": "Bring gloves",
                "event_date": "2030-05-01T09:00:00Z",
                "total_spots": 1
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let opportunity_id = opportunity["id"].as_i64().unwrap();

    let rsvp_uri = format!("/api/volunteer/opportunities/{}/rsvp", opportunity_id);
    let (status, rsvp) = send(&router, json_request("POST", &rsvp_uri, Some(&volunteer), json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rsvp["status"], "confirmed");

    let (status, _) = send(&router, json_request("POST", &rsvp_uri, Some(&volunteer), json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = send(&router, get("/api/volunteer/rsvps", Some(&volunteer))).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_announcement_unread_count_through_api() {
    let (router, _dir) = setup().await;
    let staff = login(&router, "staff", "sam@foundation.org").await;
    let volunteer = login(&router, "volunteer", "ann@example.org").await;

    let (status, announcement) = send(
        &router,
        json_request(
            "POST",
            "/api/admin/announcements",
            Some(&staff),
            json!({ "title": "Food drive", "body": "Saturday at the community hall" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&router, get("/api/volunteer/announcements", Some(&volunteer))).await;
    assert_eq!(body["unread_count"], 1);

    let read_uri = format!("/api/volunteer/announcements/{}/read", announcement["id"]);
    let (status, _) = send(&router, json_request("POST", &read_uri, Some(&volunteer), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, get("/api/volunteer/announcements", Some(&volunteer))).await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["announcements"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_scholarship_upload_is_served_back() {
    let (router, _dir) = setup().await;

    let (status, stored) = send(
        &router,
        json_request(
            "POST",
            "/api/uploads/scholarship",
            None,
            json!({
                "file_name": "transcript.pdf",
                "content_base64": STANDARD.encode(b"%PDF-1.4 transcript"),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored["bucket"], "scholarship-documents");

    let uri = format!("/storage/scholarship-documents/{}", stored["key"].as_str().unwrap());
    let response = router.clone().oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 transcript");
}

#[tokio::test]
async fn test_donation_return_outcome() {
    let (router, _dir) = setup().await;

    let (_, body) = send(&router, get("/api/donations/return?success=true", None)).await;
    assert_eq!(body["outcome"], "succeeded");

    let (_, body) = send(&router, get("/api/donations/return?canceled=true", None)).await;
    assert_eq!(body["outcome"], "canceled");
}

#[tokio::test]
async fn test_checkout_rejects_bad_amount() {
    let (router, _dir) = setup().await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/create-checkout-session",
            None,
            json!({ "amount": 0, "donationType": "general", "isRecurring": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
