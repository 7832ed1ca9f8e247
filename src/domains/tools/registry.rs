//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The fixed list of tool descriptors (name, description, price, handler)
//! - The price table consumed by the payment gate
//! - HTTP dispatch for tool calls

use std::collections::HashMap;

use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;
use tracing::warn;

use super::ToolError;
use super::definitions::holidays::HolidayApiClient;
use super::definitions::{
    AvailableCountriesTool, CountryInfoTool, IsTodayPublicHolidayTool, LongWeekendTool,
    NextPublicHolidaysTool, NextPublicHolidaysWorldwideTool, PublicHolidaysTool, VersionTool,
};
use super::handlers::{DispatchFn, EndpointTool, dispatch, to_tool};
use crate::core::payment::PriceQuote;

/// Everything known about one tool. Immutable after startup.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub tool: Tool,
    pub price: PriceQuote,
    handler: DispatchFn,
}

impl ToolDescriptor {
    pub fn of<T: EndpointTool>() -> Self {
        Self {
            name: T::NAME,
            endpoint: T::ENDPOINT,
            tool: to_tool::<T>(),
            price: T::price(),
            handler: dispatch::<T>,
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("price", &self.price)
            .finish_non_exhaustive()
    }
}

/// Tool registry - manages all available tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: HolidayApiClient,
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Create the registry of all holiday tools.
    pub fn new(client: HolidayApiClient) -> Self {
        Self {
            client,
            tools: vec![
                ToolDescriptor::of::<CountryInfoTool>(),
                ToolDescriptor::of::<AvailableCountriesTool>(),
                ToolDescriptor::of::<LongWeekendTool>(),
                ToolDescriptor::of::<PublicHolidaysTool>(),
                ToolDescriptor::of::<IsTodayPublicHolidayTool>(),
                ToolDescriptor::of::<NextPublicHolidaysTool>(),
                ToolDescriptor::of::<NextPublicHolidaysWorldwideTool>(),
                ToolDescriptor::of::<VersionTool>(),
            ],
        }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    /// Look up a descriptor by tool name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Price per tool name, for the payment gate.
    pub fn price_table(&self) -> HashMap<String, PriceQuote> {
        self.tools
            .iter()
            .map(|t| (t.name.to_string(), t.price.clone()))
            .collect()
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        let Some(descriptor) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };
        (descriptor.handler)(arguments, self.client.clone()).await
    }
}
