//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **HTTP**: JSON-RPC over POST behind the payment gate - feature: `http`
//! - **STDIO**: standard input/output for local development - feature: `stdio`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
