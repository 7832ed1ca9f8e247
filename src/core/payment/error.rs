//! Payment gate errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("X-PAYMENT header is required")]
    Missing,

    #[error("Invalid X-PAYMENT header: {0}")]
    MalformedHeader(String),

    #[error("Payment network '{found}' does not match required network '{expected}'")]
    NetworkMismatch { expected: String, found: String },

    #[error("Payment verification failed: {0}")]
    Rejected(String),

    #[error("Payment settlement failed: {0}")]
    SettlementFailed(String),

    /// The facilitator could not be reached or answered garbage.
    #[error("Facilitator error: {0}")]
    Facilitator(String),

    #[error("No facilitator URL configured")]
    MissingFacilitator,

    #[error("Failed to encode payment header: {0}")]
    Encode(String),
}

impl PaymentError {
    /// HTTP status the gate answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Facilitator(_) | Self::MissingFacilitator => StatusCode::BAD_GATEWAY,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::PAYMENT_REQUIRED,
        }
    }
}
