// src/test_support.rs
// Throwaway HTTP servers for unit tests

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::routing::any;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Serve `app` on an ephemeral localhost port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// One request as seen by a [`Recorder`]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Records every request and answers all of them with the same status/body
pub struct Recorder {
    status: StatusCode,
    reply: Value,
    requests: Mutex<Vec<Recorded>>,
}

impl Recorder {
    pub async fn start(status: u16, reply: Value) -> (Arc<Self>, String) {
        let recorder = Arc::new(Self {
            status: StatusCode::from_u16(status).unwrap(),
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/", any(record))
            .route("/{*path}", any(record))
            .with_state(recorder.clone());
        let base = serve(app).await;
        (recorder, base)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

async fn record(
    State(recorder): State<Arc<Recorder>>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_str(&body).ok()
    };
    recorder.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        body,
    });
    (recorder.status, recorder.reply.to_string())
}
