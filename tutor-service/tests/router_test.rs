//! Router-level tests driven through `tower::ServiceExt::oneshot` with the mock provider.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tutor_service::services::providers::mock::{MockReply, MockTextProvider};
use tutor_service::services::providers::ProviderError;
use tutor_service::{build_router, AppState};

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ask_returns_exact_answer_body() {
    let provider = Arc::new(MockTextProvider::new(MockReply::Text("42".to_string())));
    let app = build_router(AppState::new(provider.clone()));

    let response = app
        .oneshot(ask_request(r#"{"question":"What is six times seven?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], br#"{"answer":"42"}"#);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn prompt_embeds_trimmed_query() {
    let provider = Arc::new(MockTextProvider::new(MockReply::Echo));
    let app = build_router(AppState::new(provider.clone()));

    let response = app
        .oneshot(ask_request(
            r#"{"subject":" History ","chapter":"The Harappan Civilisation","question":" Name two Harappan sites. "}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompt = &provider.prompts()[0];
    assert!(prompt.contains("Subject: History\n"));
    assert!(prompt.contains("Chapter: The Harappan Civilisation\n"));
    assert!(prompt.contains(r#""""Name two Harappan sites.""""#));

    // Echo provider returns the prompt itself as the answer.
    let body = json_body(response).await;
    assert_eq!(body["answer"].as_str(), Some(prompt.as_str()));
}

#[tokio::test]
async fn blank_question_is_bad_request_and_skips_provider() {
    let provider = Arc::new(MockTextProvider::new(MockReply::Echo));
    let app = build_router(AppState::new(provider.clone()));

    let response = app
        .oneshot(ask_request(r#"{"subject":"Physics","question":"    "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Question is required");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_is_internal_server_error() {
    let provider = Arc::new(MockTextProvider::new(MockReply::Fail(
        ProviderError::RateLimited("quota exhausted".to_string()),
    )));
    let app = build_router(AppState::new(provider));

    let response = app
        .oneshot(ask_request(r#"{"question":"Define speed."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Gemini error: Rate limited: quota exhausted" })
    );
}

#[tokio::test]
async fn empty_provider_reply_uses_fallback() {
    let app = build_router(AppState::new(Arc::new(MockTextProvider::new(
        MockReply::Empty,
    ))));

    let response = app
        .oneshot(ask_request(r#"{"question":"Define speed."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "answer": "I could not generate an answer." })
    );
}

#[tokio::test]
async fn malformed_json_is_rejected_before_provider() {
    let provider = Arc::new(MockTextProvider::new(MockReply::Echo));
    let app = build_router(AppState::new(provider.clone()));

    let response = app.oneshot(ask_request("{not json")).await.unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn health_is_fixed_payload() {
    let app = build_router(AppState::new(Arc::new(MockTextProvider::new(
        MockReply::Fail(ProviderError::NetworkError("down".to_string())),
    ))));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}
