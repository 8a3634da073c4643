//! HttpSink tests against a real local endpoint
//!
//! Each test binds an axum server on an ephemeral loopback port that stands
//! in for the greenhouse API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use estufa_common::{EstufaError, GreenhouseState, RngNoise};
use estufad::{HttpSink, ShutdownSignal, Simulator, TelemetrySink};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Received = Arc<Mutex<Vec<Value>>>;

async fn receive(State(received): State<Received>, Json(body): Json<Value>) -> (StatusCode, String) {
    received.lock().unwrap().push(body);
    (StatusCode::CREATED, "stored".to_string())
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn spawn_endpoint() -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/estufa", post(receive))
        .route("/down", post(reject))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, received)
}

#[tokio::test]
async fn test_posts_json_body() {
    let (addr, received) = spawn_endpoint().await;
    let sink = HttpSink::new(format!("http://{}/estufa", addr), Some(Duration::from_secs(5))).unwrap();

    let state = GreenhouseState::default();
    let response = sink.send(&state).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.body, "stored");

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["estufa_id"], Value::from("1"));
    assert_eq!(body["temperatura_ar"].as_f64(), Some(25.0));
    assert_eq!(body["nutrientes"].as_i64(), Some(400));
    assert_eq!(body["bomba_agua"], Value::from(1));

    let echoed: GreenhouseState = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(echoed, state);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (addr, _) = spawn_endpoint().await;
    let sink = HttpSink::new(format!("http://{}/down", addr), None).unwrap();

    let response = sink.send(&GreenhouseState::default()).await.unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, "maintenance");
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = HttpSink::new(format!("http://{}/estufa", addr), Some(Duration::from_secs(2))).unwrap();
    let err = sink.send(&GreenhouseState::default()).await.unwrap_err();
    assert!(matches!(err, EstufaError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_simulator_end_to_end() {
    let (addr, received) = spawn_endpoint().await;
    let sink = HttpSink::new(format!("http://{}/estufa", addr), Some(Duration::from_secs(5))).unwrap();
    let mut sim = Simulator::new(
        GreenhouseState::initial("e2e"),
        RngNoise::seeded(8),
        Arc::new(sink),
        Duration::from_millis(1),
    )
    .with_max_cycles(Some(4));

    let summary = sim.run_loop(&ShutdownSignal::new()).await.unwrap();
    assert_eq!(summary.responded, 4);
    assert_eq!(summary.failed, 0);

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 4);
    for body in &bodies {
        let state: GreenhouseState = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(state.greenhouse_id, "e2e");
        assert!(state.within_bounds());
    }

    let last: GreenhouseState = serde_json::from_value(bodies[3].clone()).unwrap();
    assert_eq!(&last, sim.state());
}
