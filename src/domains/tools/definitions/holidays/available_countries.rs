//! Available countries tool.

use super::EndpointRequest;
use super::common::NoParams;
use crate::domains::tools::EndpointTool;

/// Lists every country the holiday API has data for.
#[derive(Debug, Clone)]
pub struct AvailableCountriesTool;

impl EndpointTool for AvailableCountriesTool {
    const NAME: &'static str =
        "retrieve_the_complete_list_of_all_countries_supported_by_the_nagerdate_api";

    const DESCRIPTION: &'static str = "This endpoint returns all countries for which public-holiday data is available. \
         Each entry includes the country's name and ISO code.";

    const ENDPOINT: &'static str = "/api/v3/AvailableCountries";

    type Params = NoParams;

    fn request(_params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
    }
}
