//! Nager.Date version tool.

use super::EndpointRequest;
use super::common::NoParams;
use crate::domains::tools::EndpointTool;

/// Reports the Nager.Date library version running behind the API.
#[derive(Debug, Clone)]
pub struct VersionTool;

impl EndpointTool for VersionTool {
    const NAME: &'static str = "retrieve_the_current_version_information_of_the_nagerdate_library";

    const DESCRIPTION: &'static str = "This endpoint returns detailed version information about the Nager.Date \
         implementation running on the server, including the exact NuGet package version used by \
         the API.";

    const ENDPOINT: &'static str = "/api/v3/Version";

    type Params = NoParams;

    fn request(_params: &Self::Params) -> EndpointRequest {
        EndpointRequest::new(Self::ENDPOINT)
    }
}
