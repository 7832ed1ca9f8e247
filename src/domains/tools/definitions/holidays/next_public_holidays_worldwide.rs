//! Upcoming public holidays tool (all countries, next 7 days).

use super::EndpointRequest;
use super::common::NoParams;
use crate::domains::tools::EndpointTool;

/// Worldwide upcoming holidays tool implementation.
#[derive(Debug, Clone)]
pub struct NextPublicHolidaysWorldwideTool;

impl EndpointTool for NextPublicHolidaysWorldwideTool {
    const NAME: &'static str =
        "retrieve_all_public_holidays_occurring_worldwide_within_the_next_7_days";

    const DESCRIPTION: &'static str = "This global endpoint aggregates upcoming holidays across all supported countries, \
         enabling international systems to detect near-term events.";

    const ENDPOINT: &'static str = "/api/v3/NextPublicHolidaysWorldwide";

    type Params = NoParams;

    fn request(_params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
    }
}
