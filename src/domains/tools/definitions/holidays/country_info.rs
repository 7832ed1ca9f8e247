//! Country information tool.
//!
//! Retrieves metadata for one country: common and official names, region,
//! and neighbouring countries where available.

use schemars::JsonSchema;
use serde::Deserialize;

use super::EndpointRequest;
use super::common::default_country_code;
use crate::domains::tools::EndpointTool;

/// Parameters for the country information lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfoParams {
    #[schemars(description = "The 2-letter ISO 3166-1 country code (e.g., \"US\", \"GB\"). Default: \"us\"")]
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

/// Country information tool implementation.
#[derive(Debug, Clone)]
pub struct CountryInfoTool;

impl EndpointTool for CountryInfoTool {
    const NAME: &'static str = "retrieves_detailed_information_about_a_specific_country";

    const DESCRIPTION: &'static str = "Provide a valid `ISO 3166-1 alpha-2` country code to retrieve country metadata. \
         The response includes commonly used and official country names, the assigned region, \
         and if available neighboring countries based on geographical borders.";

    const ENDPOINT: &'static str = "/api/v3/CountryInfo/{countryCode}";

    type Params = CountryInfoParams;

    fn request(params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT).path("countryCode", &params.country_code)
    }
}
