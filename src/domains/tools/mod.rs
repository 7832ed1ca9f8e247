//! Tools domain module.
//!
//! Tools are the operations MCP clients call. Each one forwards to a single
//! Nager.Date endpoint.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per endpoint)
//! - `handlers.rs` - The `EndpointTool` trait and the shared call path
//! - `router.rs` - Dynamic ToolRouter builder for STDIO transport
//! - `registry.rs` - Tool descriptors, price table, and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/holidays/` implementing `EndpointTool`
//! 2. Export it in `definitions/holidays/mod.rs`
//! 3. Add it to `ToolRegistry::new()` and `build_tool_router()`

pub mod definitions;
mod error;
pub mod handlers;
mod registry;
pub mod router;

pub use definitions::holidays::{HolidayApiClient, UpstreamError};
pub use error::ToolError;
pub use handlers::EndpointTool;
pub use registry::{ToolDescriptor, ToolRegistry};
pub use router::build_tool_router;
