//! In-process LLM provider stub
//!
//! Serves both wire formats on an ephemeral port and records what it
//! received, so tests can assert on the exact request shape.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Clone)]
struct ProviderState {
    reply: Reply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct MockProvider {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockProvider {
    /// Answers every request with `status` and `body`
    pub async fn start(status: u16, body: &str) -> Self {
        Self::start_delayed(status, body, Duration::ZERO).await
    }

    pub async fn start_delayed(status: u16, body: &str, delay: Duration) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            reply: Reply {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                delay,
            },
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .route("/v1beta/models/{target}", post(generate_content))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            captured,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<ProviderState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    respond(state, "/chat/completions".to_string(), query, headers, body).await
}

async fn generate_content(
    State(state): State<ProviderState>,
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = format!("/v1beta/models/{}", target);
    respond(state, path, query, headers, body).await
}

async fn respond(
    state: ProviderState,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    state.captured.lock().unwrap().push(CapturedRequest {
        path,
        authorization,
        query,
        body,
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}
