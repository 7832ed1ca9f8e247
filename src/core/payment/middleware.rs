//! axum middleware enforcing the payment gate on the JSON-RPC route.

use axum::{
    Json,
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{PaymentError, PaymentGate, PaymentRequiredBody, PaymentRequirements, X402_VERSION};

pub const X_PAYMENT: HeaderName = HeaderName::from_static("x-payment");
pub const X_PAYMENT_RESPONSE: HeaderName = HeaderName::from_static("x-payment-response");

/// Largest JSON-RPC request body the gate will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Largest JSON-RPC response body the gate will buffer before settling.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Deserialize)]
struct RpcEnvelope {
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// Name of the tool a `tools/call` body invokes, if that is what it is.
fn called_tool(body: &[u8]) -> Option<String> {
    let envelope: RpcEnvelope = serde_json::from_slice(body).ok()?;
    if envelope.method != "tools/call" {
        return None;
    }
    envelope.params?.get("name")?.as_str().map(str::to_string)
}

/// True when a JSON-RPC response body carries an `error` member.
fn is_rpc_error(body: &[u8]) -> bool {
    serde_json::from_slice::<Value>(body).is_ok_and(|v| v.get("error").is_some())
}

/// Gate `tools/call` requests for priced tools; everything else passes.
///
/// The payment is verified before the handler runs and settled only after
/// it answered 2xx with a JSON-RPC result rather than an error. The settle response is returned in `X-PAYMENT-RESPONSE`.
pub async fn require_payment(
    State(gate): State<PaymentGate>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes: Bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response();
        }
    };

    let quote = called_tool(&bytes).and_then(|tool| gate.price(&tool).cloned().map(|q| (tool, q)));
    let Some((tool, quote)) = quote else {
        return next.run(Request::from_parts(parts, Body::from(bytes))).await;
    };

    let requirements = gate.requirements(&quote, parts.uri.path());
    let header = match parts.headers.get(&X_PAYMENT).map(|v| v.to_str()) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            let err = PaymentError::MalformedHeader("header is not ASCII".to_string());
            return payment_error_response(&err, &requirements);
        }
    };

    let payload = match gate.authorize(header, &requirements).await {
        Ok(payload) => payload,
        Err(e) => {
            info!(tool = %tool, status = e.status().as_u16(), "Payment refused: {}", e);
            return payment_error_response(&e, &requirements);
        }
    };

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    if !response.status().is_success() {
        warn!(tool = %tool, status = %response.status(), "Call failed; payment not settled");
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_RESPONSE_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(tool = %tool, "Failed to read response body: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };
    if is_rpc_error(&bytes) {
        warn!(tool = %tool, "Call rejected by the server; payment not settled");
        return Response::from_parts(parts, Body::from(bytes));
    }
    let mut response = Response::from_parts(parts, Body::from(bytes));

    match gate.settle(&payload, &requirements).await {
        Ok(Some(settlement)) => match settlement
            .to_header()
            .and_then(|h| HeaderValue::from_str(&h).map_err(|e| PaymentError::Encode(e.to_string())))
        {
            Ok(value) => {
                response.headers_mut().insert(X_PAYMENT_RESPONSE, value);
                response
            }
            Err(e) => payment_error_response(&e, &requirements),
        },
        Ok(None) => response,
        Err(e) => {
            warn!(tool = %tool, "Settlement failed: {}", e);
            payment_error_response(&e, &requirements)
        }
    }
}

fn payment_error_response(error: &PaymentError, requirements: &PaymentRequirements) -> Response {
    let body = PaymentRequiredBody {
        x402_version: X402_VERSION,
        error: error.to_string(),
        accepts: vec![requirements.clone()],
    };
    (error.status(), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FacilitatorStub, sample_payload};
    use super::super::{FacilitatorVerifier, PaymentVerifier, PriceQuote, SettleResponse, TestingVerifier};
    use super::*;
    use axum::{Router, middleware::from_fn_with_state, routing::post};
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOOL: &str = "retrieve_the_current_version_information_of_the_nagerdate_library";

    fn gate_with(verifier: Arc<dyn PaymentVerifier>) -> PaymentGate {
        let prices = HashMap::from([(TOOL.to_string(), PriceQuote::standard("Version"))]);
        PaymentGate::new(prices, "0xabc", verifier)
    }

    fn app(gate: PaymentGate, status: StatusCode) -> Router {
        app_answering(gate, status, json!({"jsonrpc": "2.0", "id": 1, "result": {}}))
    }

    fn app_answering(gate: PaymentGate, status: StatusCode, body: Value) -> Router {
        Router::new()
            .route(
                "/mcp",
                post(move || {
                    let body = body.clone();
                    async move { (status, Json(body)) }
                }),
            )
            .route_layer(from_fn_with_state(gate, require_payment))
    }

    fn rpc(method: &str, name: &str, payment: Option<String>) -> Request {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": {"name": name, "arguments": {}}
        });
        let mut builder = axum::http::Request::post("/mcp").header("content-type", "application/json");
        if let Some(payment) = payment {
            builder = builder.header(X_PAYMENT, payment);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_called_tool() {
        let call = br#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"x"}}"#;
        assert_eq!(called_tool(call), Some("x".to_string()));
        assert_eq!(called_tool(br#"{"jsonrpc":"2.0","method":"tools/list"}"#), None);
        assert_eq!(called_tool(b"not json"), None);
    }

    #[tokio::test]
    async fn test_non_call_methods_pass() {
        let app = app(gate_with(Arc::new(TestingVerifier)), StatusCode::OK);
        let response = app.oneshot(rpc("tools/list", "", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unpriced_tool_passes() {
        let app = app(gate_with(Arc::new(TestingVerifier)), StatusCode::OK);
        let response = app.oneshot(rpc("tools/call", "free_tool", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_payment_is_402_with_requirements() {
        let app = app(gate_with(Arc::new(TestingVerifier)), StatusCode::OK);
        let response = app.oneshot(rpc("tools/call", TOOL, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let body = json_body(response).await;
        assert_eq!(body["x402Version"], 1);
        assert!(body["error"].as_str().unwrap().contains("X-PAYMENT"));
        let accepts = body["accepts"].as_array().unwrap();
        assert_eq!(accepts.len(), 1);
        assert_eq!(accepts[0]["scheme"], "exact");
        assert_eq!(accepts[0]["network"], "sepolia");
        assert_eq!(accepts[0]["payTo"], "0xabc");
        assert_eq!(accepts[0]["resource"], "/mcp");
        assert_eq!(accepts[0]["maxAmountRequired"], "1000000000000000");
    }

    #[tokio::test]
    async fn test_malformed_payment_is_402() {
        let app = app(gate_with(Arc::new(TestingVerifier)), StatusCode::OK);
        let response = app
            .oneshot(rpc("tools/call", TOOL, Some("%%%".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_testing_mode_payment_passes_without_settlement() {
        let app = app(gate_with(Arc::new(TestingVerifier)), StatusCode::OK);
        let header = sample_payload("sepolia").to_header().unwrap();
        let response = app.oneshot(rpc("tools/call", TOOL, Some(header))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(X_PAYMENT_RESPONSE).is_none());
    }

    #[tokio::test]
    async fn test_facilitator_settles_after_success() {
        let stub = FacilitatorStub::spawn(
            json!({"isValid": true, "payer": "0xpayer"}),
            json!({"success": true, "transaction": "0xtx", "network": "sepolia"}),
            None,
        )
        .await;
        let verifier = Arc::new(FacilitatorVerifier::new(&stub.base_url, None).unwrap());
        let app = app(gate_with(verifier), StatusCode::OK);

        let header = sample_payload("sepolia").to_header().unwrap();
        let response = app.oneshot(rpc("tools/call", TOOL, Some(header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.settle_calls(), 1);

        use base64::Engine;
        let encoded = response.headers()[X_PAYMENT_RESPONSE].to_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        let settlement: SettleResponse = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(settlement.transaction.as_deref(), Some("0xtx"));
    }

    #[tokio::test]
    async fn test_failed_call_is_not_settled() {
        let stub = FacilitatorStub::spawn(json!({"isValid": true}), json!({"success": true}), None).await;
        let verifier = Arc::new(FacilitatorVerifier::new(&stub.base_url, None).unwrap());
        let app = app(gate_with(verifier), StatusCode::INTERNAL_SERVER_ERROR);

        let header = sample_payload("sepolia").to_header().unwrap();
        let response = app.oneshot(rpc("tools/call", TOOL, Some(header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(stub.settle_calls(), 0);
    }

    #[tokio::test]
    async fn test_rpc_error_is_not_settled() {
        let stub = FacilitatorStub::spawn(json!({"isValid": true}), json!({"success": true}), None).await;
        let verifier = Arc::new(FacilitatorVerifier::new(&stub.base_url, None).unwrap());
        let app = app_answering(
            gate_with(verifier),
            StatusCode::OK,
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "Invalid arguments"}}),
        );

        let header = sample_payload("sepolia").to_header().unwrap();
        let response = app.oneshot(rpc("tools/call", TOOL, Some(header))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(X_PAYMENT_RESPONSE).is_none());
        assert_eq!(stub.settle_calls(), 0);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32602);
    }

    #[test]
    fn test_is_rpc_error() {
        assert!(is_rpc_error(br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600}}"#));
        assert!(!is_rpc_error(br#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        assert!(!is_rpc_error(b""));
    }

    #[tokio::test]
    async fn test_unreachable_facilitator_is_502() {
        let verifier = Arc::new(FacilitatorVerifier::new("http://127.0.0.1:1", None).unwrap());
        let app = app(gate_with(verifier), StatusCode::OK);

        let header = sample_payload("sepolia").to_header().unwrap();
        let response = app.oneshot(rpc("tools/call", TOOL, Some(header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
