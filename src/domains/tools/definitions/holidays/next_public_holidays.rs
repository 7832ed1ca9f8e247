//! Upcoming public holidays tool (one country, next 365 days).

use schemars::JsonSchema;
use serde::Deserialize;

use super::EndpointRequest;
use super::common::default_country_code;
use crate::domains::tools::EndpointTool;

/// Parameters for the upcoming holiday listing.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextPublicHolidaysParams {
    #[schemars(description = "A valid `ISO 3166-1 alpha-2` country code. Default: \"us\"")]
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

/// Upcoming public holidays tool implementation.
#[derive(Debug, Clone)]
pub struct NextPublicHolidaysTool;

impl EndpointTool for NextPublicHolidaysTool {
    const NAME: &'static str = "retrieve_all_upcoming_public_holidays_occurring_within_the_next_365_days_for_a_given_country";

    const DESCRIPTION: &'static str = "The list includes only future holidays relative to the current date and is useful \
         for forecasting, event planning, and applications that provide forward-looking holiday \
         insights.";

    const ENDPOINT: &'static str = "/api/v3/NextPublicHolidays/{countryCode}";

    type Params = NextPublicHolidaysParams;

    fn request(params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT).path("countryCode", &params.country_code)
    }
}
