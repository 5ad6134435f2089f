//! In-process upload endpoint for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify};

#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Option<Value>,
    hits: Arc<AtomicUsize>,
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
    gate: Option<Arc<Notify>>,
}

/// A `/upload` route answering every request with a fixed status and JSON body
pub struct MockEndpoint {
    pub url: String,
    hits: Arc<AtomicUsize>,
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
}

impl MockEndpoint {
    pub async fn spawn(status: StatusCode, body: Option<Value>) -> Self {
        Self::start(status, body, None).await
    }

    /// Like `spawn`, but each response is held back until `gate` is notified
    pub async fn spawn_gated(status: StatusCode, body: Option<Value>, gate: Arc<Notify>) -> Self {
        Self::start(status, body, Some(gate)).await
    }

    async fn start(status: StatusCode, body: Option<Value>, gate: Option<Arc<Notify>>) -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock endpoint");
        let addr = listener.local_addr().expect("mock endpoint addr");

        let hits = Arc::new(AtomicUsize::new(0));
        let parts = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body,
            hits: hits.clone(),
            parts: parts.clone(),
            gate,
        };
        let app = Router::new()
            .route("/upload", post(handle_upload))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}/upload"),
            hits,
            parts,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn parts(&self) -> Vec<ReceivedPart> {
        self.parts.lock().await.clone()
    }
}

async fn handle_upload(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.parts.lock().await.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }

    if let Some(gate) = &state.gate {
        gate.notified().await;
    }

    match state.body {
        Some(body) => (state.status, Json(body)).into_response(),
        None => state.status.into_response(),
    }
}
