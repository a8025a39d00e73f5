//! Test helpers for tutor-service integration tests.
//!
//! The Gemini API is stood in for by a wiremock server; the application
//! listens on a random port.

#![allow(dead_code)]

use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tutor_service::config::{GeminiSettings, TutorConfig, DEFAULT_GEMINI_MODEL};
use tutor_service::services::providers::TextProvider;
use tutor_service::startup::Application;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application against a Gemini stand-in at `gemini`.
    pub async fn spawn(gemini: &MockServer) -> Self {
        let config = test_config(&format!("{}/v1beta", gemini.uri()));
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        Self::start(app).await
    }

    /// Spawn the application around a custom provider.
    pub async fn spawn_with_provider(provider: Arc<dyn TextProvider>) -> Self {
        let config = test_config("http://127.0.0.1:9/v1beta");
        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn ask(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/ask", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn test_config(api_base: &str) -> TutorConfig {
    TutorConfig {
        common: Config {
            port: 0,
            ..Config::default()
        },
        gemini: GeminiSettings {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: api_base.to_string(),
            timeout_secs: Some(5),
        },
    }
}

/// Path of the generateContent method for the default model.
pub fn generate_path() -> String {
    format!("/v1beta/models/{}:generateContent", DEFAULT_GEMINI_MODEL)
}

/// A successful Gemini response carrying `text`.
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 17, "totalTokenCount": 59}
    })
}

/// Mount a generateContent stub that answers with `response`.
pub async fn mount_generate(server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

/// Prompt text of every generateContent request the stand-in received.
pub async fn received_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|req| serde_json::from_slice::<Value>(&req.body).ok())
        .filter_map(|body| {
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .map(str::to_string)
        })
        .collect()
}
