//! Nager.Date API client.
//!
//! Translates one tool call into exactly one upstream GET. The endpoint
//! template is interpolated with path values, optional query parameters are
//! filtered down to the ones actually present, and the response is either
//! decoded JSON or a typed [`UpstreamError`]. No retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::config::UpstreamConfig;

/// Public Nager.Date deployment.
pub const DEFAULT_BASE_URL: &str = "https://date.nager.at";

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failures of a single upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("HTTP {status} for url: {url}")]
    Status { status: StatusCode, url: String },

    /// No complete response within the timeout.
    #[error("request timed out for url: {url}")]
    Timeout { url: String },

    /// Connection, TLS, or protocol failure.
    #[error("request failed for url: {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx response whose body is not JSON.
    #[error("invalid JSON in response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// 2xx response with no body where a JSON document was expected.
    #[error("empty response body (HTTP {status}) from {url}")]
    Empty { status: StatusCode, url: String },

    /// The endpoint could not be turned into a URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl UpstreamError {
    fn from_reqwest(error: reqwest::Error, url: &Url) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Decoded body of a successful upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// The JSON document, untouched.
    Json(Value),
    /// 2xx with no body at all.
    Empty { status: StatusCode, url: String },
}

impl UpstreamBody {
    /// Status of an empty response, `None` for a JSON body.
    pub fn empty_status(&self) -> Option<StatusCode> {
        match self {
            Self::Json(_) => None,
            Self::Empty { status, .. } => Some(*status),
        }
    }

    /// The JSON document. An empty body is an error.
    pub fn into_json(self) -> Result<Value, UpstreamError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Empty { status, url } => Err(UpstreamError::Empty { status, url }),
        }
    }
}

/// One GET against an endpoint template such as
/// `/api/v3/LongWeekend/{year}/{countryCode}`.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    template: &'static str,
    path: Vec<(&'static str, String)>,
    query: Vec<(&'static str, Option<String>)>,
}

impl EndpointRequest {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            path: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Bind the `{name}` placeholder of the template.
    pub fn path(mut self, name: &'static str, value: impl ToString) -> Self {
        self.path.push((name, value.to_string()));
        self
    }

    /// Declare an optional query parameter. `None` means absent and the key
    /// is left out of the query string entirely.
    pub fn query<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.query.push((name, value.map(|v| v.to_string())));
        self
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Query parameters that are present, in declaration order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.query
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
            .collect()
    }

    /// Resolve against `base_url`. Path values are percent-encoded as
    /// single segments.
    pub fn url(&self, base_url: &str) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UpstreamError::InvalidUrl(format!("{base_url} cannot be a base URL"))
            })?;
            segments.pop_if_empty();

            for segment in self.template.split('/').filter(|s| !s.is_empty()) {
                match placeholder(segment) {
                    Some(name) => {
                        let value = self
                            .path
                            .iter()
                            .find(|(n, _)| *n == name)
                            .map(|(_, v)| v.as_str())
                            .ok_or_else(|| {
                                UpstreamError::InvalidUrl(format!(
                                    "no value for '{{{name}}}' in {}",
                                    self.template
                                ))
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            let query = serde_urlencoded::to_string(&pairs)
                .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
            url.set_query(Some(&query));
        }

        Ok(url)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// HTTP client for the holiday API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HolidayApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl HolidayApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.as_str()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue the GET. Any non-2xx status is an error and its body is
    /// never parsed.
    #[instrument(skip(self, request), fields(endpoint = request.template()))]
    pub async fn get(&self, request: &EndpointRequest) -> Result<UpstreamBody, UpstreamError> {
        let url = request.url(&self.base_url)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;

        debug!("Response {} ({} bytes)", status, bytes.len());

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(UpstreamBody::Empty {
                status,
                url: url.to_string(),
            });
        }

        serde_json::from_slice(&bytes)
            .map(UpstreamBody::Json)
            .map_err(|source| UpstreamError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::holidays::test_support::{
        FixtureServer, client_for, client_with_timeout,
    };
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const LONG_WEEKEND: &str = "/api/v3/LongWeekend/{year}/{countryCode}";

    #[test]
    fn test_absent_optional_is_dropped() {
        let request = EndpointRequest::new(LONG_WEEKEND)
            .path("year", 2026)
            .path("countryCode", "us")
            .query("availableBridgeDays", Some(1))
            .query::<&str>("subdivisionCode", None);

        let url = assert_ok!(request.url(DEFAULT_BASE_URL));
        assert_eq!(url.path(), "/api/v3/LongWeekend/2026/us");
        assert_eq!(url.query(), Some("availableBridgeDays=1"));
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let request = EndpointRequest::new("/api/v3/IsTodayPublicHoliday/{countryCode}")
            .path("countryCode", "at")
            .query("offset", Some(0))
            .query("countyCode", Some(""));

        assert_eq!(request.query_pairs(), vec![("offset", "0"), ("countyCode", "")]);
        let url = assert_ok!(request.url(DEFAULT_BASE_URL));
        assert_eq!(url.query(), Some("offset=0&countyCode="));
    }

    #[test]
    fn test_no_query_string_without_parameters() {
        let url = assert_ok!(
            EndpointRequest::new("/api/v3/CountryInfo/{countryCode}")
                .path("countryCode", "US")
                .url(DEFAULT_BASE_URL)
        );
        assert_eq!(url.as_str(), "https://date.nager.at/api/v3/CountryInfo/US");
    }

    #[test]
    fn test_path_values_are_single_encoded_segments() {
        let url = assert_ok!(
            EndpointRequest::new("/api/v3/CountryInfo/{countryCode}")
                .path("countryCode", "../Version")
                .url("http://127.0.0.1:9/")
        );
        assert_eq!(url.path(), "/api/v3/CountryInfo/..%2FVersion");
    }

    #[test]
    fn test_base_url_prefix_is_kept() {
        let url = assert_ok!(EndpointRequest::new("/api/v3/Version").url("http://mirror.local/nager/"));
        assert_eq!(url.as_str(), "http://mirror.local/nager/api/v3/Version");
    }

    #[test]
    fn test_unbound_placeholder_is_rejected() {
        let result = EndpointRequest::new("/api/v3/CountryInfo/{countryCode}").url(DEFAULT_BASE_URL);
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_success_returns_body_unchanged() {
        let body = json!([{"countryCode": "AD", "name": "Andorra"}, {"countryCode": "AL", "name": "Albania"}]);
        let server = FixtureServer::json(StatusCode::OK, body.clone()).await;
        let client = client_for(&server);

        let result = assert_ok!(client.get(&EndpointRequest::new("/api/v3/AvailableCountries")).await);
        assert_eq!(result, UpstreamBody::Json(body));
    }

    #[tokio::test]
    async fn test_scalar_body_passes_through() {
        let server = FixtureServer::json(StatusCode::OK, json!(true)).await;
        let client = client_for(&server);

        let result = assert_ok!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        assert_eq!(result, UpstreamBody::Json(json!(true)));
    }

    #[tokio::test]
    async fn test_non_2xx_is_status_error() {
        let server = FixtureServer::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"ok": true})).await;
        let client = client_for(&server);

        let err = assert_err!(client.get(&EndpointRequest::new("/api/v3/AvailableCountries")).await);
        match &err {
            UpstreamError::Status { status, url } => {
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(url.ends_with("/api/v3/AvailableCountries"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = FixtureServer::text(StatusCode::OK, "<html>maintenance</html>").await;
        let client = client_for(&server);

        let err = assert_err!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        assert!(matches!(err, UpstreamError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_empty_body_is_reported_with_status() {
        let server = FixtureServer::text(StatusCode::NO_CONTENT, "").await;
        let client = client_for(&server);

        let result = assert_ok!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        assert_eq!(result.empty_status(), Some(StatusCode::NO_CONTENT));

        let err = assert_err!(result.into_json());
        assert!(matches!(err, UpstreamError::Empty { status, .. } if status == StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_whitespace_body_is_empty() {
        let server = FixtureServer::text(StatusCode::OK, "  \n").await;
        let client = client_for(&server);

        let result = assert_ok!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        assert_eq!(result.empty_status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_slow_upstream_is_timeout() {
        let server = FixtureServer::slow(Duration::from_secs(3)).await;
        let client = client_with_timeout(&server, 1);

        let err = assert_err!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        match &err {
            UpstreamError::Timeout { url } => assert!(url.ends_with("/api/v3/Version")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = HolidayApiClient::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        let err = assert_err!(client.get(&EndpointRequest::new("/api/v3/Version")).await);
        assert!(matches!(
            err,
            UpstreamError::Transport { .. } | UpstreamError::Timeout { .. }
        ));
    }
}
