//! Per-call payment gate (x402).
//!
//! Each priced tool carries a [`PriceQuote`]. A `tools/call` for a priced
//! tool must present an `X-PAYMENT` header that decodes to a
//! [`PaymentPayload`] on the quoted network; the configured
//! [`PaymentVerifier`] then verifies it and, once the call has succeeded,
//! settles it.

mod error;
mod types;
mod verifier;

#[cfg(feature = "http")]
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

pub use error::PaymentError;
pub use types::{
    Eip712Domain, PaymentPayload, PaymentRequiredBody, PaymentRequirements, PriceQuote,
    SettleResponse, TokenAmount, TokenAsset, VerifyResponse, X402_VERSION,
};
pub use verifier::{FacilitatorVerifier, PaymentVerifier, TestingVerifier, verifier_from_config};

use crate::core::config::PaymentConfig;

/// Prices, payee and verifier. Cheap to clone.
#[derive(Clone)]
pub struct PaymentGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    prices: HashMap<String, PriceQuote>,
    pay_to: String,
    verifier: Arc<dyn PaymentVerifier>,
}

impl PaymentGate {
    pub fn new(
        prices: HashMap<String, PriceQuote>,
        pay_to: impl Into<String>,
        verifier: Arc<dyn PaymentVerifier>,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                prices,
                pay_to: pay_to.into(),
                verifier,
            }),
        }
    }

    pub fn from_config(
        config: &PaymentConfig,
        prices: HashMap<String, PriceQuote>,
    ) -> Result<Self, PaymentError> {
        for (tool, quote) in &prices {
            if quote.network() != config.network {
                warn!(
                    "Tool {} is priced on {} but NETWORK is {}",
                    tool,
                    quote.network(),
                    config.network
                );
            }
        }
        info!("Payment gate: {} priced tools", prices.len());

        Ok(Self::new(
            prices,
            config.server_address.clone(),
            verifier_from_config(config)?,
        ))
    }

    /// Quote for `tool`, or `None` if calling it is free.
    pub fn price(&self, tool: &str) -> Option<&PriceQuote> {
        self.inner.prices.get(tool)
    }

    pub fn requirements(&self, quote: &PriceQuote, resource: &str) -> PaymentRequirements {
        PaymentRequirements::for_quote(quote, &self.inner.pay_to, resource)
    }

    /// Check the `X-PAYMENT` header value against `requirements`.
    pub async fn authorize(
        &self,
        header: Option<&str>,
        requirements: &PaymentRequirements,
    ) -> Result<PaymentPayload, PaymentError> {
        let payload = PaymentPayload::from_header(header.ok_or(PaymentError::Missing)?)?;

        if payload.network != requirements.network {
            return Err(PaymentError::NetworkMismatch {
                expected: requirements.network.clone(),
                found: payload.network,
            });
        }

        let verdict = self.inner.verifier.verify(&payload, requirements).await?;
        if !verdict.is_valid {
            return Err(PaymentError::Rejected(
                verdict
                    .invalid_reason
                    .unwrap_or_else(|| "payment is not valid".to_string()),
            ));
        }

        info!(
            payer = verdict.payer.as_deref().unwrap_or("?"),
            verifier = self.inner.verifier.name(),
            "Payment verified"
        );
        Ok(payload)
    }

    /// Settle a payment that [`authorize`](Self::authorize) accepted.
    pub async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<Option<SettleResponse>, PaymentError> {
        let Some(settlement) = self.inner.verifier.settle(payload, requirements).await? else {
            return Ok(None);
        };

        if !settlement.success {
            return Err(PaymentError::SettlementFailed(
                settlement
                    .error_reason
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        info!(
            tx = settlement.transaction.as_deref().unwrap_or("?"),
            "Payment settled"
        );
        Ok(Some(settlement))
    }
}

impl std::fmt::Debug for PaymentGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGate")
            .field("priced_tools", &self.inner.prices.len())
            .field("pay_to", &self.inner.pay_to)
            .field("verifier", &self.inner.verifier.name())
            .finish()
    }
}
