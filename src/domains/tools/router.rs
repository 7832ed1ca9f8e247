//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Routes are built from the same `EndpointTool` definitions as the
//! registry, so both transports expose the same tools.

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::holidays::HolidayApiClient;
use super::definitions::{
    AvailableCountriesTool, CountryInfoTool, IsTodayPublicHolidayTool, LongWeekendTool,
    NextPublicHolidaysTool, NextPublicHolidaysWorldwideTool, PublicHolidaysTool, VersionTool,
};
use super::handlers::create_route;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: HolidayApiClient) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(create_route::<CountryInfoTool, S>(client.clone()))
        .with_route(create_route::<AvailableCountriesTool, S>(client.clone()))
        .with_route(create_route::<LongWeekendTool, S>(client.clone()))
        .with_route(create_route::<PublicHolidaysTool, S>(client.clone()))
        .with_route(create_route::<IsTodayPublicHolidayTool, S>(client.clone()))
        .with_route(create_route::<NextPublicHolidaysTool, S>(client.clone()))
        .with_route(create_route::<NextPublicHolidaysWorldwideTool, S>(client.clone()))
        .with_route(create_route::<VersionTool, S>(client))
}
