//! Local axum server that records requests and replays canned responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Default)]
struct Shared {
    requests: Vec<CapturedRequest>,
    responses: VecDeque<(StatusCode, String)>,
}

type SharedState = Arc<Mutex<Shared>>;

pub struct StubServer {
    base_url: String,
    shared: SharedState,
}

impl StubServer {
    /// Binds to an ephemeral local port and starts serving.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("local addr");
        let shared = SharedState::default();

        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&shared));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queues a response. Requests beyond the queue get `200 {}`.
    pub fn respond(&self, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.shared
            .lock()
            .unwrap()
            .responses
            .push_back((status, body.into()));
    }

    pub fn respond_json(&self, status: u16, body: &serde_json::Value) {
        self.respond(status, body.to_string());
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.shared.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests().pop().expect("at least one request")
    }
}

async fn record(
    State(shared): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let (status, body) = {
        let mut shared = shared.lock().unwrap();
        shared.requests.push(CapturedRequest {
            method: method.to_string(),
            target,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        shared
            .responses
            .pop_front()
            .unwrap_or_else(|| (StatusCode::OK, "{}".to_string()))
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
