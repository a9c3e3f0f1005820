use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use predlb_cache::config::CacheConfig;
use predlb_core::models::features::FeatureVector;
use predlb_core::models::user::User;
use predlb_features::config::DataConfig;
use predlb_predictor::ProbabilityPredictor;
use predlb_server::app;
use predlb_server::state::AppState;
use predlb_storage::RecordStore;

const DATA: &str = r#"{
    "subject": {
        "features": {"age": {"type": "numerical"}},
        "predictor_features": ["age"]
    },
    "modalities": [
        {
            "modality": "acoustic",
            "features": {"jitter": {"type": "numerical", "name": "Jitter (local)"}},
            "predictor_features": ["jitter"]
        },
        {
            "modality": "questionnaire",
            "features": {"q1": {"type": "ordinal", "order": ["1", "2", "3"]}},
            "predictor_features": ["q1"],
            "questionnaire": [{"id": "q1", "question": "Sleep quality", "options": ["good", "fair", "poor"]}]
        }
    ]
}"#;

/// Answers 42.17 for every vector and counts calls.
#[derive(Default)]
struct FixedPredictor {
    calls: AtomicUsize,
}

impl ProbabilityPredictor for FixedPredictor {
    fn predict_probability(&self, _user: &mut User, _features: &FeatureVector, _model: &str) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(42.17)
    }
}

fn setup() -> (Router, Arc<FixedPredictor>) {
    let store = Arc::new(RecordStore::in_memory());
    let predictor = Arc::new(FixedPredictor::default());
    let state = AppState::new(
        store,
        predictor.clone(),
        DataConfig::from_json(DATA).unwrap(),
        &CacheConfig::default(),
        "lbd",
    );
    (app(state), predictor)
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/users", None, Some(json!({"username": "dr-who"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_subject_with_session(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/subjects",
        None,
        Some(json!({"code": "P001", "age": 68, "sex": "M"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, session) = send(
        app,
        "POST",
        "/subjects/P001/sessions",
        None,
        Some(json!({"examined_on": "2024-03-01T09:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["session_number"], 1);
    session["id"].as_str().unwrap().to_string()
}

fn acoustic(jitter: f64) -> Value {
    json!({"data": {"kind": "feature_table", "features": [{"label": "jitter", "value": jitter}]}})
}

#[tokio::test]
async fn health_check() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn modalities_follow_configured_order() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/modalities", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["modality"], "acoustic");
    assert_eq!(body[0]["features"][0]["title"], "Jitter (local)");
    assert_eq!(body[0]["features"][0]["type"], "numerical");
    assert_eq!(body[1]["name"], "Questionnaire");
    assert_eq!(body[1]["questions"][0], "Sleep quality");
}

#[tokio::test]
async fn created_users_hide_predictor_secrets() {
    let (app, _) = setup();
    let (status, body) = send(&app, "POST", "/users", None, Some(json!({"username": "dr-who"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["predictor_username"].as_str().unwrap().starts_with("predlb-"));
    assert!(body.get("password").is_none());
    assert!(body.get("predictor").is_none());
}

#[tokio::test]
async fn subject_lifecycle() {
    let (app, _) = setup();
    create_subject_with_session(&app).await;

    let (status, _) = send(&app, "POST", "/subjects", None, Some(json!({"code": "P001", "age": 1, "sex": "F"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/subjects", None, Some(json!({"code": "bad code", "age": 1, "sex": "F"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", "/subjects/P001", None, Some(json!({"age": 69, "nationality": "CZ"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["age"], 69);
    assert_eq!(body["nationality"], "CZ");
    assert_eq!(body["last_examined_on"], "2024-03-01T09:00:00Z");

    let (status, body) = send(&app, "GET", "/subjects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/subjects/P404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn sessions_are_numbered_per_subject() {
    let (app, _) = setup();
    create_subject_with_session(&app).await;
    let (_, second) = send(&app, "POST", "/subjects/P001/sessions", None, Some(json!({}))).await;
    assert_eq!(second["session_number"], 2);

    let (status, body) = send(&app, "GET", "/subjects/P001/sessions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    let (status, _) = send(&app, "GET", "/subjects/P404/sessions", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn records_are_validated_against_modality() {
    let (app, _) = setup();
    let session = create_subject_with_session(&app).await;

    let uri = format!("/sessions/{session}/records/questionnaire");
    let (status, _) = send(&app, "PUT", &uri, None, Some(acoustic(0.02))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/sessions/{session}/records/smell");
    let (status, _) = send(&app, "PUT", &uri, None, Some(acoustic(0.02))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/sessions/{session}/records/questionnaire");
    let answers = json!({"data": {"kind": "questionnaire", "answers": {"q1": 2}}});
    let (status, body) = send(&app, "PUT", &uri, None, Some(answers)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modality"], "questionnaire");

    let (status, body) = send(&app, "GET", &format!("/sessions/{session}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn probability_requires_a_known_user() {
    let (app, _) = setup();
    create_subject_with_session(&app).await;

    let (status, _) = send(&app, "GET", "/subjects/P001/probability", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stranger = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, "GET", "/subjects/P001/probability", Some(&stranger), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn probability_is_cached_until_a_record_changes() {
    let (app, predictor) = setup();
    let user = create_user(&app).await;
    let session = create_subject_with_session(&app).await;

    // No records yet: nothing to predict on.
    let (status, body) = send(&app, "GET", "/subjects/P001/probability", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["probability"], Value::Null);
    assert_eq!(body["display"], "");

    let record_uri = format!("/sessions/{session}/records/acoustic");
    send(&app, "PUT", &record_uri, None, Some(acoustic(0.02))).await;

    let (_, body) = send(&app, "GET", "/subjects/P001/probability", Some(&user), None).await;
    assert_eq!(body["probability"], 42.17);
    assert_eq!(body["display"], "42.17 %");

    let session_uri = format!("/sessions/{session}/probability");
    let (_, body) = send(&app, "GET", &session_uri, Some(&user), None).await;
    assert_eq!(body["probability"], 42.17);
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);

    send(&app, "PUT", &record_uri, None, Some(acoustic(0.03))).await;
    send(&app, "GET", &session_uri, Some(&user), None).await;
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 2);

    let (_, subject) = send(&app, "GET", "/subjects/P001", None, None).await;
    assert_eq!(subject["lbd_probability"], 42.17);
}

#[tokio::test]
async fn report_lists_sessions_with_probabilities() {
    let (app, _) = setup();
    let user = create_user(&app).await;
    let session = create_subject_with_session(&app).await;
    send(&app, "POST", "/subjects/P001/sessions", None, Some(json!({}))).await;
    send(
        &app,
        "PUT",
        &format!("/sessions/{session}/records/acoustic"),
        None,
        Some(acoustic(0.02)),
    )
    .await;

    let (status, report) = send(&app, "GET", "/subjects/P001/report", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["lbd_probability"]["display"], "42.17 %");
    assert_eq!(report["subject"]["lbd_probability"], 42.17);

    let sessions = report["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["modalities"], json!(["acoustic"]));
    assert_eq!(sessions[0]["lbd_probability"]["probability"], 42.17);
    assert_eq!(sessions[1]["lbd_probability"]["probability"], Value::Null);
    assert_eq!(sessions[1]["lbd_probability"]["display"], "");
}
