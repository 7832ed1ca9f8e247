//! "Is today a public holiday" tool.
//!
//! The upstream endpoint answers with its status code alone: 200 when today
//! is a public holiday, 204 when it is not. Bodies are usually empty, so an
//! empty answer is turned into `{"isPublicHoliday": bool, "statusCode": n}`.

use reqwest::StatusCode;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::EndpointRequest;
use super::common::default_country_code;
use crate::domains::tools::EndpointTool;

fn default_offset() -> Option<i32> {
    Some(0)
}

/// Parameters for the holiday check.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IsTodayPublicHolidayParams {
    #[schemars(description = "A valid `ISO 3166-1 alpha-2` country code. Default: \"us\"")]
    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[schemars(description = "The subdivision code (e.g., state, province) to narrow the check")]
    #[serde(default)]
    pub county_code: Option<String>,

    #[schemars(description = "UTC timezone offset in hours (range: -12 to +12). Default: 0")]
    #[serde(default = "default_offset")]
    pub offset: Option<i32>,
}

/// Holiday check tool implementation.
#[derive(Debug, Clone)]
pub struct IsTodayPublicHolidayTool;

impl EndpointTool for IsTodayPublicHolidayTool {
    const NAME: &'static str = "determines_whether_today_is_a_public_holiday_in_the_specified_country_optionally_adjusted_by_a_utc_offset";

    const DESCRIPTION: &'static str = "By default, the calculation is based on the current UTC date. You may optionally \
         provide a timezone offset to evaluate the holiday status relative to a different local \
         timezone. This endpoint is optimized for simple command-line or automation workflows \
         where only the HTTP status code is required.";

    const ENDPOINT: &'static str = "/api/v3/IsTodayPublicHoliday/{countryCode}";

    type Params = IsTodayPublicHolidayParams;

    fn request(params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
            .path("countryCode", &params.country_code)
            .query("countyCode", params.county_code.as_deref())
            .query("offset", params.offset)
    }

    fn empty_response(status: StatusCode) -> Option<Value> {
        Some(json!({
            "isPublicHoliday": status == StatusCode::OK,
            "statusCode": status.as_u16(),
        }))
    }
}
