mod common;

use axum::http::StatusCode;
use common::{get, parse_body, post_json, TestApp};
use serde_json::json;
use tokio::task::JoinSet;
use tower::ServiceExt;

#[tokio::test]
async fn concurrent_scans_yield_exactly_one_success() {
    let app = TestApp::new().await;
    let (_, token) = app.create_guest("Alice", "alice@example.com").await;

    let res = app
        .router
        .clone()
        .oneshot(post_json(
            &format!("/api/rsvp/{}", token),
            &json!({"dinner": true, "cocktail": false}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let router = app.router.clone();
        let token = token.clone();
        set.spawn(async move {
            let res = router
                .oneshot(post_json("/api/scan", &json!({"code": token})))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            parse_body(res).await["status"].as_str().unwrap().to_string()
        });
    }

    let mut successes = 0;
    let mut duplicates = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap().as_str() {
            "success" => successes += 1,
            "duplicate" => duplicates += 1,
            other => panic!("Unexpected scan status: {}", other),
        }
    }

    assert_eq!(successes, 1, "Exactly one concurrent scan may win");
    assert_eq!(duplicates, 9);
}

#[tokio::test]
async fn racing_submissions_never_overbook() {
    let app = TestApp::with_capacity("leather:1630=3").await;

    let mut tokens = Vec::new();
    for i in 0..10 {
        let (_, token) = app
            .create_guest(&format!("Guest {}", i), &format!("g{}@example.com", i))
            .await;
        tokens.push(token);
    }

    let mut set = JoinSet::new();
    for token in tokens {
        let router = app.router.clone();
        set.spawn(async move {
            let res = router
                .oneshot(post_json(
                    &format!("/api/rsvp/{}", token),
                    &json!({
                        "dinner": true, "cocktail": false,
                        "workshop": {"activity": "leather", "slot": "1630"}
                    }),
                ))
                .await
                .unwrap();
            res.status()
        });
    }

    let mut ok = 0;
    let mut full = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => full += 1,
            other => panic!("Unexpected status: {}", other),
        }
    }

    assert_eq!(ok, 3, "All seats filled, none double-sold");
    assert_eq!(full, 7);

    let res = app
        .router
        .clone()
        .oneshot(get("/api/workshops/availability"))
        .await
        .unwrap();
    let body = parse_body(res).await;
    assert_eq!(body["workshops"]["leather"]["1630"]["booked"], 3);
    assert_eq!(body["workshops"]["leather"]["1630"]["available"], 0);
}

#[tokio::test]
async fn concurrent_workshop_scans_yield_exactly_one_success() {
    let app = TestApp::new().await;
    let (_, token) = app.create_guest("Bob", "bob@example.com").await;

    let res = app
        .router
        .clone()
        .oneshot(post_json(
            &format!("/api/rsvp/{}", token),
            &json!({
                "dinner": true, "cocktail": false,
                "workshop": {"activity": "perfume", "slot": "1630"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mut set = JoinSet::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let token = token.clone();
        set.spawn(async move {
            let res = router
                .oneshot(post_json(
                    "/api/workshops/perfume/scan",
                    &json!({"code": token}),
                ))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            parse_body(res).await["status"].as_str().unwrap().to_string()
        });
    }

    let mut successes = 0;
    while let Some(res) = set.join_next().await {
        if res.unwrap() == "success" {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}
