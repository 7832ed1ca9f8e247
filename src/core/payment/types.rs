//! Wire types of the x402 payment protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PaymentError;

/// Protocol version carried in every payload and 402 body.
pub const X402_VERSION: u8 = 1;

/// The only supported scheme: pay exactly the quoted amount.
pub const SCHEME_EXACT: &str = "exact";

/// Seconds a signed payment stays acceptable.
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Per-call price in token base units (0.001 of an 18-decimal token).
pub const STANDARD_AMOUNT: &str = "1000000000000000";

/// Settlement token contract.
pub const STANDARD_ASSET_ADDRESS: &str = "0x3e17730bb2ca51a8D5deD7E44c003A2e95a4d822";

pub const STANDARD_ASSET_DECIMALS: u8 = 18;

pub const STANDARD_NETWORK: &str = "sepolia";

/// Payment descriptions are cut to this many characters.
const DESCRIPTION_MAX_CHARS: usize = 50;

/// EIP-712 signing domain of the settlement token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAsset {
    pub address: String,
    pub decimals: u8,
    pub network: String,
    pub eip712: Eip712Domain,
}

/// An amount in the token's base units, as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub amount: String,
    pub asset: TokenAsset,
}

/// What one tool call costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: TokenAmount,
    pub description: String,
}

impl PriceQuote {
    /// The flat per-call price every holiday tool charges.
    pub fn standard(description: &str) -> Self {
        Self {
            price: TokenAmount {
                amount: STANDARD_AMOUNT.to_string(),
                asset: TokenAsset {
                    address: STANDARD_ASSET_ADDRESS.to_string(),
                    decimals: STANDARD_ASSET_DECIMALS,
                    network: STANDARD_NETWORK.to_string(),
                    eip712: Eip712Domain {
                        name: "IATPWallet".to_string(),
                        version: "1".to_string(),
                    },
                },
            },
            description: description.chars().take(DESCRIPTION_MAX_CHARS).collect(),
        }
    }

    pub fn network(&self) -> &str {
        &self.price.asset.network
    }
}

/// What a client must pay to call one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    pub max_amount_required: String,
    pub resource: String,
    pub description: String,
    pub mime_type: String,
    pub pay_to: String,
    pub max_timeout_seconds: u64,
    pub asset: String,
    pub extra: Eip712Domain,
}

impl PaymentRequirements {
    pub fn for_quote(quote: &PriceQuote, pay_to: &str, resource: &str) -> Self {
        Self {
            scheme: SCHEME_EXACT.to_string(),
            network: quote.price.asset.network.clone(),
            max_amount_required: quote.price.amount.clone(),
            resource: resource.to_string(),
            description: quote.description.clone(),
            mime_type: "application/json".to_string(),
            pay_to: pay_to.to_string(),
            max_timeout_seconds: MAX_TIMEOUT_SECONDS,
            asset: quote.price.asset.address.clone(),
            extra: quote.price.asset.eip712.clone(),
        }
    }
}

/// Decoded `X-PAYMENT` header. The signed `payload` is opaque here and
/// only inspected by the facilitator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPayload {
    #[serde(rename = "x402Version", default = "default_x402_version")]
    pub x402_version: u8,
    pub scheme: String,
    pub network: String,
    #[serde(default)]
    pub payload: Value,
}

fn default_x402_version() -> u8 {
    X402_VERSION
}

impl PaymentPayload {
    /// Decode base64 JSON as sent in the `X-PAYMENT` header.
    pub fn from_header(header: &str) -> Result<Self, PaymentError> {
        use base64::Engine;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(header.trim())
            .map_err(|e| PaymentError::MalformedHeader(format!("invalid base64: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| PaymentError::MalformedHeader(format!("invalid payment payload: {e}")))
    }

    /// Encode for the `X-PAYMENT` header.
    pub fn to_header(&self) -> Result<String, PaymentError> {
        encode_header(self)
    }
}

/// Body of a 402 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequiredBody {
    #[serde(rename = "x402Version")]
    pub x402_version: u8,
    pub error: String,
    pub accepts: Vec<PaymentRequirements>,
}

/// Body POSTed to the facilitator's `/verify` and `/settle`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitatorRequest<'a> {
    #[serde(rename = "x402Version")]
    pub x402_version: u8,
    pub payment_payload: &'a PaymentPayload,
    pub payment_requirements: &'a PaymentRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl VerifyResponse {
    pub fn valid(payer: Option<String>) -> Self {
        Self {
            is_valid: true,
            invalid_reason: None,
            payer,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl SettleResponse {
    /// Encode for the `X-PAYMENT-RESPONSE` header.
    pub fn to_header(&self) -> Result<String, PaymentError> {
        encode_header(self)
    }
}

fn encode_header<T: Serialize>(value: &T) -> Result<String, PaymentError> {
    use base64::Engine;

    let json = serde_json::to_vec(value).map_err(|e| PaymentError::Encode(e.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(json))
}
