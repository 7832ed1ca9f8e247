//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/holidays/` with one file
//! per tool. Each tool implements `EndpointTool`:
//! - Parameters struct (for rmcp and HTTP argument parsing)
//! - Endpoint template and the mapping of parameters onto it
//! - Price quote consumed by the payment gate
//!
//! The STDIO transport serves them through the `ToolRouter` built in
//! `domains/tools/router.rs`; the HTTP transport dispatches through the
//! `ToolRegistry`. **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::config::Config;
use super::error::Result as CoreResult;
use super::payment::PriceQuote;
use crate::domains::tools::{HolidayApiClient, ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Public holiday data from the Nager.Date API: supported countries, \
     country details, public holidays per year, upcoming holidays, long weekends and whether \
     today is a holiday. Every tool call requires an x402 payment on the HTTP transport.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and owns the
/// immutable state shared by every call: configuration, the tool registry
/// and the upstream client inside it.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool registry used by the HTTP transport.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> CoreResult<Self> {
        let config = Arc::new(config);
        let client = HolidayApiClient::new(&config.upstream)?;

        Ok(Self {
            tool_router: build_tool_router::<Self>(client.clone()),
            registry: Arc::new(ToolRegistry::new(client)),
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Price of every tool, keyed by tool name.
    pub fn price_table(&self) -> HashMap<String, PriceQuote> {
        self.registry.price_table()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Upstream failures come back as a successful result carrying the
    /// error envelope; only unknown tools and bad arguments are errors.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> CoreResult<serde_json::Value> {
        let result = self.registry.call_tool(name, arguments).await?;
        Ok(serde_json::to_value(result)?)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
