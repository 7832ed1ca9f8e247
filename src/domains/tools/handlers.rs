//! Tool handlers module.
//!
//! Every holiday tool implements [`EndpointTool`]: it names its endpoint
//! template, declares its parameters, and maps those parameters onto an
//! [`EndpointRequest`]. The generic functions here turn that declaration
//! into tool metadata, an rmcp route for STDIO, and a dispatcher for HTTP,
//! so the catch-and-envelope logic lives in exactly one place.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use super::ToolError;
use super::definitions::holidays::{
    EndpointRequest, ErrorEnvelope, HolidayApiClient, common::call_result,
};
use crate::core::payment::PriceQuote;

/// A tool backed by exactly one upstream GET endpoint.
pub trait EndpointTool: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Upstream endpoint template, e.g. `/api/v3/CountryInfo/{countryCode}`.
    const ENDPOINT: &'static str;

    /// Arguments accepted by the tool.
    type Params: DeserializeOwned + JsonSchema + Send + Sync + 'static;

    /// Map arguments onto the upstream request.
    fn request(params: &Self::Params) -> EndpointRequest;

    /// Value returned when upstream answers 2xx with an empty body.
    /// `None` makes the empty body an upstream error.
    fn empty_response(_status: StatusCode) -> Option<Value> {
        None
    }

    /// Price charged per call.
    fn price() -> PriceQuote {
        PriceQuote::standard(Self::DESCRIPTION)
    }
}

/// Tool metadata for listing.
pub fn to_tool<T: EndpointTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Run the tool: one upstream call, never an error.
///
/// Success yields the upstream JSON unchanged; any failure is logged with
/// the tool name and yields the error envelope for `T::ENDPOINT`.
pub async fn execute<T: EndpointTool>(params: &T::Params, client: &HolidayApiClient) -> Value {
    info!("Calling {} ({})", T::NAME, T::ENDPOINT);

    let outcome = client.get(&T::request(params)).await.and_then(|body| {
        match body.empty_status().and_then(T::empty_response) {
            Some(value) => Ok(value),
            None => body.into_json(),
        }
    });

    match outcome {
        Ok(value) => value,
        Err(e) => {
            error!("Error in {}: {}", T::NAME, e);
            ErrorEnvelope::new(e.to_string(), T::ENDPOINT).into_value()
        }
    }
}

/// Deserialize tool arguments. A missing or null argument object means
/// "all defaults".
pub fn parse_arguments<T: EndpointTool>(arguments: Value) -> Result<T::Params, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_arguments(format!("{}: {}", T::NAME, e)))
}

/// Signature shared by every tool's HTTP dispatcher.
pub type DispatchFn =
    fn(Value, HolidayApiClient) -> BoxFuture<'static, Result<CallToolResult, ToolError>>;

/// HTTP dispatcher for this tool.
pub fn dispatch<T: EndpointTool>(
    arguments: Value,
    client: HolidayApiClient,
) -> BoxFuture<'static, Result<CallToolResult, ToolError>> {
    async move {
        let params = parse_arguments::<T>(arguments)?;
        Ok(call_result(execute::<T>(&params, &client).await))
    }
    .boxed()
}

/// Create a ToolRoute for STDIO transport.
pub fn create_route<T, S>(client: HolidayApiClient) -> ToolRoute<S>
where
    T: EndpointTool,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let client = client.clone();
        async move {
            let params: T::Params = serde_json::from_value(Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

            Ok(call_result(execute::<T>(&params, &client).await))
        }
        .boxed()
    })
}
