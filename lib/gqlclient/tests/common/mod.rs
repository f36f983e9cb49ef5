#![allow(dead_code, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use rstest::fixture;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use gqlclient::GraphQlClient;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// What the mock server answers to every request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
    pub delay: Duration,
}

impl Reply {
    pub fn json(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::from(body.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request received by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Debug, Clone)]
struct MockState {
    reply: Arc<Mutex<Reply>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

/// A GraphQL endpoint answering a canned reply and recording what it receives.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> anyhow::Result<Self> {
        let state = MockState {
            reply: Arc::new(Mutex::new(Reply::json(&serde_json::json!({ "data": null })))),
            recorded: Arc::default(),
        };

        let router = Router::new()
            .route("/graphql", post(graphql))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching mock server");

        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                tracing::error!(?error, "mock server stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }

    pub fn client(&self) -> GraphQlClient {
        GraphQlClient::new(self.endpoint()).expect("valid mock endpoint")
    }

    pub fn reply_with(&self, reply: Reply) {
        *self.state.reply.lock().expect("reply lock") = reply;
    }

    pub fn reply_json(&self, body: &Value) {
        self.reply_with(Reply::json(body));
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().expect("recorded lock").clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.recorded()
            .pop()
            .expect("the mock server should have received a request")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn graphql(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state
        .recorded
        .lock()
        .expect("recorded lock")
        .push(Recorded { headers, body });

    let reply = state.reply.lock().expect("reply lock").clone();
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (reply.status, [(CONTENT_TYPE, "application/json")], reply.body)
}

#[fixture]
pub async fn server() -> MockServer {
    init_tracing();
    match MockServer::start().await {
        Ok(server) => server,
        Err(error) => {
            panic!("fail to start mock server: {error:?}");
        }
    }
}
