//! Nager.Date MCP Server Library
//!
//! This crate exposes the public holiday API at <https://date.nager.at> as a
//! set of Model Context Protocol (MCP) tools. Every tool is a single HTTP GET
//! passthrough, and every tool call over HTTP must carry a payment accepted
//! by the payment gate.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler, the
//!   payment gate, and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the holiday API tools and the upstream dispatcher
//!
//! # Example
//!
//! ```rust,no_run
//! use nager_date_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
