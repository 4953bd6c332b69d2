/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use convoy_models::models::agents::{Agent, AgentStatus};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

async fn register_agent(app: &axum::Router, name: &str) -> Agent {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/agents/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({
                        "name": name,
                        "platform": "linux-x64",
                        "version": "1.0.0",
                        "ip_address": "10.1.2.3"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_register_agent_endpoint() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let name = fixture.unique_name("api-agent");

    let agent = register_agent(&app, &name).await;
    assert_eq!(agent.name, name);
    assert_eq!(agent.status, AgentStatus::Online);

    // Registering the same name again keeps the id stable.
    let again = register_agent(&app, &name).await;
    assert_eq!(again.id, agent.id);
}

#[tokio::test]
async fn test_register_agent_rejects_empty_name() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/agents/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"name": "", "platform": "linux-x64", "version": "1.0.0"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_agent_not_found() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/agents/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_agent_endpoint() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let agent = register_agent(&app, &fixture.unique_name("api-agent")).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/agents/{}", agent.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/agents/{}", agent.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
