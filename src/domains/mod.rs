//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server. Only `tools` exists today: the holiday API exposes no resources
//! or prompts.

pub mod tools;
