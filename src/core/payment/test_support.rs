//! In-process stand-in for an x402 facilitator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use super::PaymentPayload;

#[derive(Clone)]
struct StubState {
    verify: Value,
    settle: Value,
    token: Option<&'static str>,
    last_request: Arc<Mutex<Option<Value>>>,
    settle_calls: Arc<AtomicUsize>,
}

pub struct FacilitatorStub {
    pub base_url: String,
    last_request: Arc<Mutex<Option<Value>>>,
    settle_calls: Arc<AtomicUsize>,
}

impl FacilitatorStub {
    /// Answers `/verify` and `/settle` with fixed bodies. With `token`,
    /// requests without that bearer token get 401.
    pub async fn spawn(verify: Value, settle: Value, token: Option<&'static str>) -> Self {
        let state = StubState {
            verify,
            settle,
            token,
            last_request: Arc::default(),
            settle_calls: Arc::default(),
        };
        let last_request = state.last_request.clone();
        let settle_calls = state.settle_calls.clone();

        let app = Router::new()
            .route("/verify", post(verify_handler))
            .route("/settle", post(settle_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            last_request,
            settle_calls,
        }
    }

    pub async fn last_request(&self) -> Option<Value> {
        self.last_request.lock().await.clone()
    }

    pub fn settle_calls(&self) -> usize {
        self.settle_calls.load(Ordering::SeqCst)
    }
}

fn authorized(state: &StubState, headers: &HeaderMap) -> bool {
    match state.token {
        None => true,
        Some(token) => headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {token}")),
    }
}

async fn verify_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *state.last_request.lock().await = Some(body);
    Json(state.verify.clone()).into_response()
}

async fn settle_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.settle_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().await = Some(body);
    Json(state.settle.clone()).into_response()
}

pub fn sample_payload(network: &str) -> PaymentPayload {
    PaymentPayload {
        x402_version: 1,
        scheme: "exact".to_string(),
        network: network.to_string(),
        payload: json!({
            "signature": "0x00",
            "authorization": {"from": "0xpayer", "to": "0xabc", "value": "1000000000000000"}
        }),
    }
}
