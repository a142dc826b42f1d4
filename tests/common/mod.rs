#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use screening_backend::{
    error::{Error, Result},
    services::{
        llm_client::{ChatClient, ChatRequest},
        screening_service::ScreeningSettings,
    },
    AppState,
};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Replies with a fixed text and records every request it receives.
pub struct CannedClient {
    reply: std::result::Result<String, String>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl CannedClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for CannedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(Error::Upstream)
    }

    async fn check_health(&self) -> Result<()> {
        self.reply
            .as_ref()
            .map(|_| ())
            .map_err(|e| Error::Upstream(e.clone()))
    }
}

pub fn setup_app(client: Arc<CannedClient>) -> Router {
    let state = AppState::with_client(client, ScreeningSettings::default());
    Router::new()
        .route("/", get(screening_backend::routes::health::root))
        .route("/health", get(screening_backend::routes::health::health))
        .route(
            "/generate-questions",
            post(screening_backend::routes::screening::generate_questions),
        )
        .route(
            "/submit-screening",
            post(screening_backend::routes::screening::submit_screening),
        )
        .route(
            "/assess-task-quality",
            post(screening_backend::routes::quality::assess_task_quality),
        )
        .with_state(state)
}

pub async fn post_json(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, json)
}
