#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use predlb_predictor::config::PredictorConfig;

/// Scripted behaviour and call counters of the fake scoring service.
pub struct Script {
    pub signup_status: AtomicU16,
    pub login_status: AtomicU16,
    pub refresh_status: AtomicU16,
    /// Statuses for successive predict calls; 200 once exhausted.
    pub predict_statuses: Mutex<VecDeque<u16>>,
    pub predicted: Mutex<Value>,
    /// Hold refresh responses past the client timeout.
    pub stall_refresh: AtomicBool,

    pub signups: AtomicUsize,
    pub logins: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub predicts: AtomicUsize,
    pub last_predict: Mutex<Option<Value>>,
    pub last_authorization: Mutex<Option<String>>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            signup_status: AtomicU16::new(200),
            login_status: AtomicU16::new(200),
            refresh_status: AtomicU16::new(200),
            predict_statuses: Mutex::new(VecDeque::new()),
            predicted: Mutex::new(json!([[0.25, 0.75]])),
            stall_refresh: AtomicBool::new(false),
            signups: AtomicUsize::new(0),
            logins: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            predicts: AtomicUsize::new(0),
            last_predict: Mutex::new(None),
            last_authorization: Mutex::new(None),
        }
    }
}

impl Script {
    pub fn queue_predict(&self, statuses: &[u16]) {
        self.predict_statuses.lock().unwrap().extend(statuses);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-process scoring service on a background runtime. Stops when dropped.
pub struct FakeService {
    pub script: Arc<Script>,
    pub port: u16,
    _runtime: tokio::runtime::Runtime,
}

impl FakeService {
    pub fn start() -> Self {
        let script = Arc::new(Script::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let port = listener.local_addr().unwrap().port();

        let app = Router::new()
            .route("/signup", post(signup))
            .route("/login", post(login))
            .route("/refresh", post(refresh))
            .route("/predict", post(predict))
            .with_state(script.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            script,
            port,
            _runtime: runtime,
        }
    }

    pub fn config(&self) -> PredictorConfig {
        PredictorConfig {
            port: self.port,
            timeout_secs: 1,
            ..PredictorConfig::default()
        }
    }
}

/// Configuration pointing at a port nothing listens on.
pub fn unreachable_config() -> PredictorConfig {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    PredictorConfig {
        port,
        timeout_secs: 1,
        ..PredictorConfig::default()
    }
}

fn status(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

async fn signup(State(script): State<Arc<Script>>) -> (StatusCode, Json<Value>) {
    script.signups.fetch_add(1, Ordering::SeqCst);
    (status(&script.signup_status), Json(json!({})))
}

async fn login(State(script): State<Arc<Script>>) -> (StatusCode, Json<Value>) {
    script.logins.fetch_add(1, Ordering::SeqCst);
    let status = status(&script.login_status);
    if status != StatusCode::OK {
        return (status, Json(json!({"msg": "bad credentials"})));
    }
    (
        status,
        Json(json!({"access_token": "access-1", "refresh_token": "refresh-1"})),
    )
}

async fn refresh(State(script): State<Arc<Script>>) -> (StatusCode, Json<Value>) {
    script.refreshes.fetch_add(1, Ordering::SeqCst);
    if script.stall_refresh.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    let status = status(&script.refresh_status);
    if status != StatusCode::OK {
        return (status, Json(json!({"msg": "refresh token revoked"})));
    }
    (status, Json(json!({"access_token": "access-2"})))
}

async fn predict(
    State(script): State<Arc<Script>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    script.predicts.fetch_add(1, Ordering::SeqCst);
    *script.last_predict.lock().unwrap() = Some(body);
    *script.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let code = script.predict_statuses.lock().unwrap().pop_front().unwrap_or(200);
    let status = StatusCode::from_u16(code).unwrap();
    if status != StatusCode::OK {
        return (status, Json(json!({"msg": "token has expired"})));
    }
    let predicted = script.predicted.lock().unwrap().clone();
    (status, Json(json!({"predicted": predicted})))
}
