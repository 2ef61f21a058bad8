//! Integration tests for the HTTP transport.
//!
//! Drives the bot through `/events` and reads replies from `/outbox`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tourney_bot::api::{self, request_id::REQUEST_ID_HEADER};
use tourney_bot::build_state;
use tourney_bot::config::BotConfig;
use tower::ServiceExt; // For `oneshot` method

const OPERATOR: i64 = 1;

fn create_test_app() -> axum::Router {
    let config = BotConfig::from_vars(
        |key| (key == "ADMIN_IDS").then(|| OPERATOR.to_string()),
        None,
        None,
    )
    .expect("Failed to build test config");
    api::create_router(build_state(&config))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_event(app: &axum::Router, user_id: i64, event: Value) -> (StatusCode, Value) {
    let body = json!({ "user_id": user_id, "display_name": format!("user{user_id}"), "event": event });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn outbox(app: &axum::Router, user_id: i64) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/outbox/{user_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["messages"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tournaments"]["total"], 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "gateway-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "gateway-7");
}

#[tokio::test]
async fn test_start_command_queues_menu() {
    let app = create_test_app();

    let (status, body) = post_event(&app, 42, json!({ "type": "command", "command": "/start" })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["outcome"], "handled");

    let messages = outbox(&app, 42).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "Welcome!");
    assert_eq!(messages[0]["buttons"][0]["payload"], "list");

    // Drained
    assert!(outbox(&app, 42).await.is_empty());
}

#[tokio::test]
async fn test_operator_only_command_is_refused() {
    let app = create_test_app();

    let (status, body) = post_event(&app, 42, json!({ "type": "command", "command": "/create" })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["outcome"], "refused");
    assert_eq!(body["error"], "Operator permission required");
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "user_id": 1, "event": { "type": "command", "command": "/dance" } })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_create_and_join_over_http() {
    let app = create_test_app();

    post_event(&app, OPERATOR, json!({ "type": "command", "command": "/create" })).await;
    for answer in ["Cup", "Brawl Stars", "Solo", "2", "100", "1", "150", "card 1234", "no"] {
        let (_, body) = post_event(&app, OPERATOR, json!({ "type": "text_input", "text": answer })).await;
        assert_eq!(body["outcome"], "handled");
    }
    let summary = outbox(&app, OPERATOR).await.pop().unwrap();
    assert!(summary["text"].as_str().unwrap().contains("Commission (30%): 60"));

    post_event(&app, 42, json!({ "type": "button_tap", "callback": "join:1" })).await;
    post_event(&app, 42, json!({ "type": "text_input", "text": "neo" })).await;
    let messages = outbox(&app, 42).await;
    assert!(
        messages
            .iter()
            .any(|m| m["text"].as_str().unwrap().contains("Pay 100 using: card 1234"))
    );

    let (_, body) = post_event(&app, 42, json!({ "type": "photo_input", "photo": "pay-42" })).await;
    assert_eq!(body["outcome"], "handled");

    let notices = outbox(&app, OPERATOR).await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["photo"], "pay-42");
    assert_eq!(notices[0]["buttons"][0]["payload"], "confirm:1:42");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["tournaments"]["total"], 1);
    assert_eq!(body["tournaments"]["active"], 1);
}
