//! In-process stand-in for the holiday API.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;

use super::HolidayApiClient;
use crate::core::config::UpstreamConfig;

/// Serves a fixed response (or an echo of the request) on `127.0.0.1:0`.
pub struct FixtureServer {
    pub base_url: String,
}

impl FixtureServer {
    async fn serve(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Responds to every GET with `{"path": ..., "query": ...}`.
    pub async fn echo() -> Self {
        async fn echo_handler(uri: Uri) -> Json<Value> {
            Json(json!({
                "path": uri.path(),
                "query": uri.query(),
            }))
        }
        Self::serve(Router::new().fallback(echo_handler)).await
    }

    /// Responds to every request with `status` and a JSON body.
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::serve(Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, Json(body)).into_response() }
        }))
        .await
    }

    /// Responds to every request with `status` and a raw text body.
    pub async fn text(status: StatusCode, body: &'static str) -> Self {
        Self::serve(Router::new().fallback(move || async move { (status, body).into_response() }))
            .await
    }

    /// Responds with `{}` only after `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::serve(Router::new().fallback(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({}))
        }))
        .await
    }
}

pub fn client_for(server: &FixtureServer) -> HolidayApiClient {
    client_with_timeout(server, 5)
}

pub fn client_with_timeout(server: &FixtureServer, timeout_secs: u64) -> HolidayApiClient {
    HolidayApiClient::new(&UpstreamConfig {
        base_url: server.base_url.clone(),
        timeout_secs,
    })
    .expect("client")
}

/// Splits an echoed query string into ordered pairs.
pub fn echoed_query(echo: &Value) -> Vec<(String, String)> {
    echo["query"]
        .as_str()
        .map(|q| serde_urlencoded::from_str(q).expect("query string"))
        .unwrap_or_default()
}
