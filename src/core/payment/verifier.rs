//! Payment verification backends.
//!
//! [`TestingVerifier`] checks nothing beyond what the gate already checked
//! and never settles. [`FacilitatorVerifier`] delegates both steps to an
//! external facilitator over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::PaymentError;
use super::types::{
    FacilitatorRequest, PaymentPayload, PaymentRequirements, SettleResponse, VerifyResponse,
    X402_VERSION,
};
use crate::core::config::PaymentConfig;

const FACILITATOR_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Check that `payload` satisfies `requirements`.
    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError>;

    /// Collect a verified payment. `None` means nothing was settled.
    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<Option<SettleResponse>, PaymentError>;

    fn name(&self) -> &'static str;
}

/// Accepts any well-formed payment. Nothing is settled.
#[derive(Debug, Clone, Default)]
pub struct TestingVerifier;

#[async_trait]
impl PaymentVerifier for TestingVerifier {
    async fn verify(
        &self,
        _payload: &PaymentPayload,
        _requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError> {
        Ok(VerifyResponse::valid(None))
    }

    async fn settle(
        &self,
        _payload: &PaymentPayload,
        _requirements: &PaymentRequirements,
    ) -> Result<Option<SettleResponse>, PaymentError> {
        debug!("Testing mode: skipping settlement");
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "testing"
    }
}

/// Remote facilitator speaking the x402 `/verify` + `/settle` API.
#[derive(Debug, Clone)]
pub struct FacilitatorVerifier {
    http: reqwest::Client,
    verify_url: Url,
    settle_url: Url,
    api_key: Option<String>,
}

impl FacilitatorVerifier {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, PaymentError> {
        let base = base_url.trim_end_matches('/');
        let endpoint = |path: &str| {
            Url::parse(&format!("{base}/{path}"))
                .map_err(|e| PaymentError::Facilitator(format!("invalid facilitator URL {base_url}: {e}")))
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FACILITATOR_TIMEOUT_SECS))
            .build()
            .map_err(|e| PaymentError::Facilitator(e.to_string()))?;

        Ok(Self {
            http,
            verify_url: endpoint("verify")?,
            settle_url: endpoint("settle")?,
            api_key,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: &Url,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<T, PaymentError> {
        let body = FacilitatorRequest {
            x402_version: X402_VERSION,
            payment_payload: payload,
            payment_requirements: requirements,
        };

        let mut request = self.http.post(url.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::Facilitator(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::Facilitator(format!("HTTP {status} from {url}")));
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Facilitator(format!("invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl PaymentVerifier for FacilitatorVerifier {
    #[instrument(skip_all, fields(resource = %requirements.resource))]
    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError> {
        self.post(&self.verify_url, payload, requirements).await
    }

    #[instrument(skip_all, fields(resource = %requirements.resource))]
    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<Option<SettleResponse>, PaymentError> {
        self.post(&self.settle_url, payload, requirements)
            .await
            .map(Some)
    }

    fn name(&self) -> &'static str {
        "facilitator"
    }
}

/// Pick the verifier the configuration asks for.
pub fn verifier_from_config(
    config: &PaymentConfig,
) -> Result<Arc<dyn PaymentVerifier>, PaymentError> {
    if config.testing_mode {
        info!("Payment verifier: testing (facilitator bypassed)");
        return Ok(Arc::new(TestingVerifier));
    }

    let url = config
        .facilitator_url
        .as_deref()
        .ok_or(PaymentError::MissingFacilitator)?;
    info!("Payment verifier: facilitator at {}", url);
    Ok(Arc::new(FacilitatorVerifier::new(
        url,
        config.facilitator_api_key.clone(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FacilitatorStub, sample_payload};
    use super::*;
    use crate::core::Config;
    use crate::core::payment::PriceQuote;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn requirements() -> PaymentRequirements {
        PaymentRequirements::for_quote(&PriceQuote::standard("Version"), "0xabc", "/mcp")
    }

    #[tokio::test]
    async fn test_testing_verifier_accepts_and_never_settles() {
        let verifier = TestingVerifier;
        let payload = sample_payload("sepolia");

        let verdict = assert_ok!(verifier.verify(&payload, &requirements()).await);
        assert!(verdict.is_valid);
        assert_eq!(assert_ok!(verifier.settle(&payload, &requirements()).await), None);
    }

    #[tokio::test]
    async fn test_facilitator_verify_and_settle() {
        let stub = FacilitatorStub::spawn(
            json!({"isValid": true, "payer": "0xpayer"}),
            json!({"success": true, "transaction": "0xtx", "network": "sepolia"}),
            None,
        )
        .await;
        let verifier = assert_ok!(FacilitatorVerifier::new(&stub.base_url, None));
        let payload = sample_payload("sepolia");

        let verdict = assert_ok!(verifier.verify(&payload, &requirements()).await);
        assert!(verdict.is_valid);
        assert_eq!(verdict.payer.as_deref(), Some("0xpayer"));

        let settled = assert_ok!(verifier.settle(&payload, &requirements()).await).unwrap();
        assert!(settled.success);
        assert_eq!(settled.transaction.as_deref(), Some("0xtx"));

        let seen = stub.last_request().await.unwrap();
        assert_eq!(seen["x402Version"], 1);
        assert_eq!(seen["paymentPayload"]["network"], "sepolia");
        assert_eq!(seen["paymentRequirements"]["payTo"], "0xabc");
    }

    #[tokio::test]
    async fn test_facilitator_bearer_token() {
        let stub = FacilitatorStub::spawn(
            json!({"isValid": true}),
            json!({"success": true}),
            Some("facilitator-key"),
        )
        .await;
        let payload = sample_payload("sepolia");

        let anonymous = assert_ok!(FacilitatorVerifier::new(&stub.base_url, None));
        let err = assert_err!(anonymous.verify(&payload, &requirements()).await);
        assert!(matches!(err, PaymentError::Facilitator(_)));

        let authorized = assert_ok!(FacilitatorVerifier::new(
            &stub.base_url,
            Some("facilitator-key".to_string())
        ));
        assert_ok!(authorized.verify(&payload, &requirements()).await);
    }

    #[tokio::test]
    async fn test_unreachable_facilitator() {
        let verifier = assert_ok!(FacilitatorVerifier::new("http://127.0.0.1:1", None));
        let err = assert_err!(verifier.verify(&sample_payload("sepolia"), &requirements()).await);
        assert!(matches!(err, PaymentError::Facilitator(_)));
        assert_eq!(err.status(), reqwest::StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_verifier_from_config() {
        let mut config = Config::for_testing().payment;
        assert_eq!(assert_ok!(verifier_from_config(&config)).name(), "testing");

        config.testing_mode = false;
        assert!(matches!(
            verifier_from_config(&config),
            Err(PaymentError::MissingFacilitator)
        ));

        config.facilitator_url = Some("https://facilitator.example.com/".to_string());
        assert_eq!(assert_ok!(verifier_from_config(&config)).name(), "facilitator");
    }
}
