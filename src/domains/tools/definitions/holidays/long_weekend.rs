//! Long weekend tool.
//!
//! A long weekend is a break of at least three consecutive days created by
//! public holidays, optionally bridged by a number of leave days.

use schemars::JsonSchema;
use serde::Deserialize;

use super::EndpointRequest;
use super::common::{default_country_code, default_year};
use crate::domains::tools::EndpointTool;

fn default_bridge_days() -> Option<i32> {
    Some(1)
}

/// Parameters for the long weekend calculation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LongWeekendParams {
    #[schemars(description = "The target year for which long-weekend data should be calculated. Default: 2026")]
    #[serde(default = "default_year")]
    pub year: i32,

    #[schemars(description = "A valid `ISO 3166-1 alpha-2` country code determining the region of interest. Default: \"us\"")]
    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[schemars(description = "The maximum number of bridge days to include when determining long-weekend opportunities. Default: 1")]
    #[serde(default = "default_bridge_days")]
    pub available_bridge_days: Option<i32>,

    #[schemars(description = "Narrow the calculation to a specific federal state, province, or subdivision (where supported)")]
    #[serde(default)]
    pub subdivision_code: Option<String>,
}

/// Long weekend tool implementation.
#[derive(Debug, Clone)]
pub struct LongWeekendTool;

impl EndpointTool for LongWeekendTool {
    const NAME: &'static str = "retrieve_all_long_weekends_for_a_given_country_and_year";

    const DESCRIPTION: &'static str = "A long weekend is calculated based on public holidays that create an extended break \
         of at least three consecutive days. Optional bridge days-weekdays between a holiday and \
         a weekend-can be included to identify potential extended leave opportunities.";

    const ENDPOINT: &'static str = "/api/v3/LongWeekend/{year}/{countryCode}";

    type Params = LongWeekendParams;

    fn request(params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
            .path("year", params.year)
            .path("countryCode", &params.country_code)
            .query("availableBridgeDays", params.available_bridge_days)
            .query("subdivisionCode", params.subdivision_code.as_deref())
    }
}
