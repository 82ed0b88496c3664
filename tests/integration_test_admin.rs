mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{admin_get, parse_body, TestApp, ADMIN_TOKEN, QR_SECRET};
use rsvp_backend::domain::services::qr::{verify, QrVerification};
use serde_json::json;
use tower::ServiceExt;

fn admin_post(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn admin_routes_require_the_capability_token() {
    let app = TestApp::new().await;

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/guests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/guests")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provisioned_guest_starts_pending_with_fresh_token() {
    let app = TestApp::new().await;

    let res = app
        .router
        .clone()
        .oneshot(admin_post(
            "/api/admin/guests",
            &json!({
                "name": "Alice",
                "email": "alice@example.com",
                "company": "Acme",
                "invite_type": "company",
                "category": "tier-a"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["rsvp_status"], "pending");
    assert_eq!(body["checked_in"], false);
    assert_eq!(body["invite_type"], "company");
    assert_eq!(body["category"], "tier-a");
    assert_eq!(body["token"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn blank_guest_fields_are_rejected() {
    let app = TestApp::new().await;

    let res = app
        .router
        .clone()
        .oneshot(admin_post(
            "/api/admin/guests",
            &json!({
                "name": "  ",
                "email": "a@example.com",
                "invite_type": "named",
                "category": "tier-c"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn import_provisions_each_row() {
    let app = TestApp::new().await;

    let res = app
        .router
        .clone()
        .oneshot(admin_post(
            "/api/admin/guests/import",
            &json!({
                "guests": [
                    {"name": "A", "email": "a@example.com", "invite_type": "named", "category": "tier-b"},
                    {"name": "B", "email": "b@example.com", "invite_type": "named", "category": "tier-c"}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["imported"], 2);

    let tokens: Vec<&str> = body["guests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["token"].as_str().unwrap())
        .collect();
    assert_ne!(tokens[0], tokens[1]);

    let res = app
        .router
        .clone()
        .oneshot(admin_get("/api/admin/guests"))
        .await
        .unwrap();
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn issued_qr_verifies_against_the_secret() {
    let app = TestApp::new().await;
    let (id, token) = app.create_guest("Bob", "bob@example.com").await;

    let res = app
        .router
        .clone()
        .oneshot(admin_get(&format!("/api/admin/guests/{}/qr", id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let qr_data = body["qr_data"].as_str().unwrap();
    assert!(body["image_url"].as_str().unwrap().contains("create-qr-code"));

    assert_eq!(
        verify(qr_data, QR_SECRET, Duration::days(30), Utc::now()),
        QrVerification::Valid {
            guest_id: id,
            token,
        }
    );
}

#[tokio::test]
async fn qr_for_unknown_guest_is_not_found() {
    let app = TestApp::new().await;

    let res = app
        .router
        .clone()
        .oneshot(admin_get("/api/admin/guests/no-such-id/qr"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
