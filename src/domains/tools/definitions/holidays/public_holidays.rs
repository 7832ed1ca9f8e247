//! Public holidays tool.
//!
//! All officially recognized public holidays of a country in a given year,
//! with local and English names, subdivision scope, and holiday types.

use schemars::JsonSchema;
use serde::Deserialize;

use super::EndpointRequest;
use super::common::{default_country_code, default_year};
use crate::domains::tools::EndpointTool;

/// Parameters for the public holiday listing.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicHolidaysParams {
    #[schemars(description = "The target year for which public holidays should be retrieved. Default: 2026")]
    #[serde(default = "default_year")]
    pub year: i32,

    #[schemars(description = "A valid `ISO 3166-1 alpha-2` country code. Default: \"us\"")]
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

/// Public holidays tool implementation.
#[derive(Debug, Clone)]
pub struct PublicHolidaysTool;

impl EndpointTool for PublicHolidaysTool {
    const NAME: &'static str =
        "retrieve_the_list_of_all_public_holidays_for_the_specified_year_and_country";

    const DESCRIPTION: &'static str = "This endpoint returns all officially recognized public holidays for the given country \
         and year. Each holiday entry includes the local and English holiday names, information \
         about whether the holiday applies nationally or only in specific subdivisions, and the \
         associated holiday type classifications.";

    const ENDPOINT: &'static str = "/api/v3/PublicHolidays/{year}/{countryCode}";

    type Params = PublicHolidaysParams;

    fn request(params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
            .path("year", params.year)
            .path("countryCode", &params.country_code)
    }
}
