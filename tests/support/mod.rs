// Stub of the remote comments service, served on an ephemeral port per test.
#![allow(dead_code)]

use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use comments_sync::interface_adapters::clients::{ClientCredentials, CommentsClient, Endpoints};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const CLIENT_SECRET: &str = "stub-secret";

// One request as the stub saw it.
#[derive(Clone, Debug)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct Stub {
    // Path -> (status, raw body).
    replies: HashMap<String, (u16, String)>,
    seen: Mutex<Vec<Captured>>,
}

#[derive(Clone)]
pub struct StubRemote {
    pub base_url: String,
    stub: Arc<Stub>,
}

impl StubRemote {
    pub fn requests(&self) -> Vec<Captured> {
        self.stub.seen.lock().expect("seen mutex poisoned").clone()
    }

    pub fn last_request(&self) -> Captured {
        self.requests()
            .pop()
            .expect("expected the stub to receive a request")
    }

    // Client pointed at this stub for both the auth issuer and the API.
    pub fn client(&self) -> CommentsClient {
        client_for(&self.base_url)
    }
}

pub fn client_for(base_url: &str) -> CommentsClient {
    let endpoints = Endpoints::new(base_url, base_url).expect("stub url parses");
    let credentials = ClientCredentials {
        client_id: "wpClient".to_string(),
        client_secret: CLIENT_SECRET.to_string(),
    };
    CommentsClient::new(endpoints, credentials, Duration::from_secs(5)).expect("client builds")
}

async fn reply(State(stub): State<Arc<Stub>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let header_text = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();

    stub.seen.lock().expect("seen mutex poisoned").push(Captured {
        method: parts.method.to_string(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        content_type: header_text(header::CONTENT_TYPE),
        authorization: header_text(header::AUTHORIZATION),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match stub.replies.get(&path) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// Start a stub that answers each path with a fixed status and body.
pub async fn spawn_stub(replies: &[(&str, u16, &str)]) -> StubRemote {
    let stub = Arc::new(Stub {
        replies: replies
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect(),
        seen: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(reply).with_state(stub.clone());
    let base_url = serve_on_ephemeral_port(app).await;

    StubRemote { base_url, stub }
}

// Bind to an ephemeral port to avoid collisions with local services.
pub async fn serve_on_ephemeral_port(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{addr}")
}

// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}
