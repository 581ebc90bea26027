use super::*;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode as HttpStatus},
    response::IntoResponse,
    routing::post,
    Router,
};
use shared::domain::Sentiment;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct RecordedRequest {
    content_type: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct ServerState {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: HttpStatus,
    body: &'static str,
    delay: Duration,
}

async fn handle_predict(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().await.push(RecordedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

async fn spawn_predict_server_with_delay(
    status: HttpStatus,
    body: &'static str,
    delay: Duration,
) -> (Url, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState {
        calls: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
        status,
        body,
        delay,
    };
    let app = Router::new()
        .route("/predict", post(handle_predict))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let endpoint = Url::parse(&format!("http://{addr}/predict")).expect("endpoint");
    (endpoint, state)
}

async fn spawn_predict_server(status: HttpStatus, body: &'static str) -> (Url, ServerState) {
    spawn_predict_server_with_delay(status, body, Duration::ZERO).await
}

fn controller_for(endpoint: Url) -> SentimentRequestController<HttpSentimentBackend> {
    SentimentRequestController::new(HttpSentimentBackend::new(endpoint, None).expect("backend"))
}

#[tokio::test]
async fn success_response_sets_result_and_posts_json_text() {
    let (endpoint, server) = spawn_predict_server(
        HttpStatus::OK,
        r#"{"sentiment":"Positive","confidence":0.87,"label":1}"#,
    )
    .await;
    let controller = controller_for(endpoint);
    controller.set_text("I love this product!");

    let outcome = controller.submit().await;

    let expected = SentimentResult::new(Sentiment::Positive, 0.87).expect("result");
    assert_eq!(outcome, SubmitOutcome::Succeeded(expected));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.request_state, RequestState::Succeeded);
    assert_eq!(snapshot.result, Some(expected));
    assert_eq!(snapshot.error, None);

    assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    let requests = server.requests.lock().await;
    assert_eq!(
        requests[0].body,
        serde_json::json!({ "text": "I love this product!" })
    );
    assert!(requests[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json")));
}

#[tokio::test]
async fn server_error_sets_fixed_failure_message() {
    for status in [HttpStatus::INTERNAL_SERVER_ERROR, HttpStatus::BAD_REQUEST] {
        let (endpoint, server) = spawn_predict_server(status, r#"{"error":"boom"}"#).await;
        let controller = controller_for(endpoint);
        controller.set_text("meh");

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed(ANALYZE_FAILED_MESSAGE.to_string()));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.request_state, RequestState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(ANALYZE_FAILED_MESSAGE));
        assert_eq!(snapshot.result, None);
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn blank_input_sends_no_request() {
    let (endpoint, server) = spawn_predict_server(
        HttpStatus::OK,
        r#"{"sentiment":"Positive","confidence":0.5}"#,
    )
    .await;
    let controller = controller_for(endpoint);

    for blank in ["", "   ", "\n\t  \r\n"] {
        controller.set_text(blank);
        let before = controller.snapshot();
        assert_eq!(controller.submit().await, SubmitOutcome::Skipped);
        assert_eq!(controller.snapshot(), before);
        assert_eq!(controller.snapshot().request_state, RequestState::Idle);
    }
    assert_eq!(server.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connection_refused_surfaces_transport_description() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let endpoint = Url::parse(&format!("http://{addr}/predict")).expect("endpoint");

    let expected = reqwest::Client::new()
        .post(endpoint.clone())
        .json(&PredictRequest {
            text: "hello".to_string(),
        })
        .send()
        .await
        .expect_err("nothing listening")
        .to_string();

    let controller = controller_for(endpoint);
    controller.set_text("hello");
    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(expected.clone()));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.request_state, RequestState::Failed);
    assert_eq!(snapshot.error, Some(expected));
    assert_eq!(snapshot.result, None);
}

#[tokio::test]
async fn malformed_success_body_is_reported_like_a_failure() {
    let (endpoint, _server) = spawn_predict_server(HttpStatus::OK, "<html>oops</html>").await;
    let controller = controller_for(endpoint);
    controller.set_text("hello");

    controller.submit().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.request_state, RequestState::Failed);
    assert!(snapshot
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("malformed sentiment response")));
    assert_eq!(snapshot.result, None);
}

#[tokio::test]
async fn out_of_range_confidence_is_rejected() {
    let (endpoint, _server) = spawn_predict_server(
        HttpStatus::OK,
        r#"{"sentiment":"Negative","confidence":87.0}"#,
    )
    .await;
    let backend = HttpSentimentBackend::new(endpoint, None).expect("backend");

    let err = backend.predict("awful").await.expect_err("must reject");

    assert!(matches!(err, PredictError::Parse(_)));
    assert!(err.to_string().contains("outside the range"));
}

#[tokio::test]
async fn unknown_label_is_rejected() {
    let (endpoint, _server) = spawn_predict_server(
        HttpStatus::OK,
        r#"{"sentiment":"Neutral","confidence":0.5}"#,
    )
    .await;
    let backend = HttpSentimentBackend::new(endpoint, None).expect("backend");

    let err = backend.predict("fine").await.expect_err("must reject");
    assert!(matches!(err, PredictError::Parse(_)));
}

#[tokio::test]
async fn configured_timeout_fails_slow_requests() {
    let (endpoint, _server) = spawn_predict_server_with_delay(
        HttpStatus::OK,
        r#"{"sentiment":"Positive","confidence":0.5}"#,
        Duration::from_secs(5),
    )
    .await;
    let backend =
        HttpSentimentBackend::new(endpoint, Some(Duration::from_millis(100))).expect("backend");

    let err = backend.predict("slow").await.expect_err("must time out");
    assert!(matches!(&err, PredictError::Transport(inner) if inner.is_timeout()));
}

#[tokio::test]
async fn missing_backend_fails_every_submit() {
    let controller =
        SentimentRequestController::new(MissingSentimentBackend::new("no endpoint configured"));
    controller.set_text("anything");

    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("sentiment backend is unavailable: no endpoint configured".into())
    );
    assert_eq!(controller.snapshot().request_state, RequestState::Failed);
}

#[test]
fn status_error_displays_fixed_message() {
    let err = PredictError::Status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.to_string(), ANALYZE_FAILED_MESSAGE);
}

#[test]
fn only_status_failures_carry_a_status_code() {
    assert_eq!(
        PredictError::Status(StatusCode::BAD_GATEWAY).status(),
        Some(StatusCode::BAD_GATEWAY)
    );
    assert_eq!(PredictError::Parse("eof".into()).status(), None);
    assert_eq!(PredictError::Unavailable("offline".into()).status(), None);
}
