//! Test helper utilities: a stub of the prediction provider and an app server
//! bound to an ephemeral port.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use creative_dashboard::{
    app_state::AppState,
    routes,
    services::{assets::AssetStore, poller::Poller, prediction::PredictionClient},
};

pub const TEST_TOKEN: &str = "r8_test_token";

/// How the stub answers.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// First status query reports success with this output.
    SucceedImmediately(Value),
    /// `processing` for this many status queries, then success.
    SucceedAfter { polls: usize, output: Value },
    /// Every prediction fails with this provider error (or none).
    FailAll(Option<String>),
    /// Stays `processing` forever.
    NeverFinish,
    /// Job creation itself is rejected.
    RejectCreate { status: u16, detail: String },
    /// Succeeds after zero polls, but without any output.
    SucceedWithoutOutput,
    /// Predictions whose prompt ends in `(variation N)` for a listed N fail.
    FailVariations { failing: Vec<usize> },
    /// Jobs are accepted but every status query is rejected.
    RejectStatus { status: u16, detail: String },
    /// Status queries report this status verbatim.
    ReportStatus(String),
    /// Created predictions advertise a status URL on another host.
    ForeignCallback,
}

#[derive(Debug, Clone)]
struct StubPrediction {
    prompt: String,
    polls: usize,
}

pub struct StubState {
    behavior: Behavior,
    base_url: OnceLock<String>,
    pub create_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    predictions: Mutex<HashMap<String, StubPrediction>>,
    /// (model, body) of every create request, in arrival order.
    pub submissions: Mutex<Vec<(String, Value)>>,
    pub auth_headers: Mutex<Vec<String>>,
    pub poll_times: Mutex<Vec<Instant>>,
}

/// Handle to a running stub provider.
#[derive(Clone)]
pub struct StubProvider {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubProvider {
    pub async fn spawn(behavior: Behavior) -> Self {
        let state = Arc::new(StubState {
            behavior,
            base_url: OnceLock::new(),
            create_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            predictions: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            poll_times: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/models/{owner}/{name}/predictions", post(stub_create))
            .route("/predictions/{id}", get(stub_status))
            .with_state(state.clone());

        let base_url = serve(app).await;
        state.base_url.set(base_url.clone()).ok();
        Self { base_url, state }
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.state.poll_calls.load(Ordering::SeqCst)
    }

    pub fn outbound_calls(&self) -> usize {
        self.create_calls() + self.poll_calls()
    }

    pub fn submissions(&self) -> Vec<(String, Value)> {
        self.state.submissions.lock().unwrap().clone()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.state.poll_times.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.state.auth_headers.lock().unwrap().clone()
    }
}

async fn stub_create(
    State(state): State<Arc<StubState>>,
    Path((owner, name)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = state.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth_headers.lock().unwrap().push(auth.to_string());
    }
    state
        .submissions
        .lock()
        .unwrap()
        .push((format!("{owner}/{name}"), body.clone()));

    if let Behavior::RejectCreate { status, detail } = &state.behavior {
        return (
            StatusCode::from_u16(*status).unwrap(),
            Json(json!({ "detail": detail })),
        );
    }

    let id = format!("pred-{n}");
    let prompt = body["input"]["prompt"].as_str().unwrap_or_default().to_string();
    state
        .predictions
        .lock()
        .unwrap()
        .insert(id.clone(), StubPrediction { prompt, polls: 0 });

    let base = match state.behavior {
        Behavior::ForeignCallback => "https://elsewhere.invalid".to_string(),
        _ => state.base_url.get().cloned().unwrap_or_default(),
    };
    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "status": "starting",
            "output": null,
            "error": null,
            "urls": { "get": format!("{base}/predictions/{id}") }
        })),
    )
}

async fn stub_status(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.poll_calls.fetch_add(1, Ordering::SeqCst);
    state.poll_times.lock().unwrap().push(Instant::now());

    if let Behavior::RejectStatus { status, detail } = &state.behavior {
        return (
            StatusCode::from_u16(*status).unwrap(),
            Json(json!({ "detail": detail })),
        );
    }

    let (prompt, polls) = {
        let mut predictions = state.predictions.lock().unwrap();
        match predictions.get_mut(&id) {
            Some(p) => {
                p.polls += 1;
                (p.prompt.clone(), p.polls)
            }
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "detail": "Prediction not found" })),
                )
            }
        }
    };

    let (status, output, error) = match &state.behavior {
        Behavior::SucceedImmediately(output) => ("succeeded", output.clone(), Value::Null),
        Behavior::SucceedAfter { polls: wait, output } => {
            if polls > *wait {
                ("succeeded", output.clone(), Value::Null)
            } else {
                ("processing", Value::Null, Value::Null)
            }
        }
        Behavior::FailAll(message) => (
            "failed",
            Value::Null,
            message.clone().map(Value::String).unwrap_or(Value::Null),
        ),
        Behavior::NeverFinish | Behavior::RejectStatus { .. } => {
            ("processing", Value::Null, Value::Null)
        }
        Behavior::ReportStatus(status) => (status.as_str(), Value::Null, Value::Null),
        Behavior::ForeignCallback => ("succeeded", json!("https://x/video.mp4"), Value::Null),
        Behavior::RejectCreate { .. } => ("failed", Value::Null, Value::Null),
        Behavior::SucceedWithoutOutput => ("succeeded", Value::Null, Value::Null),
        Behavior::FailVariations { failing } => {
            let failed = failing
                .iter()
                .any(|n| prompt.ends_with(&format!("(variation {n})")));
            if failed {
                ("failed", Value::Null, json!("Model error"))
            } else {
                ("succeeded", json!([format!("https://x/{id}.png")]), Value::Null)
            }
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "id": id, "status": status, "output": output, "error": error })),
    )
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Short interval so tests finish quickly; attempts as in production.
pub fn fast_poller() -> Poller {
    Poller::new(Duration::from_millis(2), 120)
}

pub fn client_for(stub: &StubProvider) -> PredictionClient {
    PredictionClient::new(&stub.base_url, Some(TEST_TOKEN.to_string()))
}

/// Dashboard app running against `stub`.
pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    pub http: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(stub: &StubProvider) -> Self {
        Self::spawn_with(client_for(stub), fast_poller()).await
    }

    pub async fn spawn_without_token(stub: &StubProvider) -> Self {
        Self::spawn_with(PredictionClient::new(&stub.base_url, None), fast_poller()).await
    }

    pub async fn spawn_with(client: PredictionClient, poller: Poller) -> Self {
        let state = AppState::new(client, poller, AssetStore::new());
        let base_url = serve(routes::router(state.clone())).await;
        Self {
            base_url,
            state,
            http: reqwest::Client::new(),
        }
    }

    /// POST JSON and return status plus decoded body.
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        decode(response).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        decode(response).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .patch(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> StatusCode {
        let response = self
            .http
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        StatusCode::from_u16(response.status().as_u16()).unwrap()
    }
}

async fn decode(response: reqwest::Response) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let text = response.text().await.unwrap();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}

/// Ten bytes that are not any known image format.
pub fn fake_image_base64() -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(b"0123456789")
}
