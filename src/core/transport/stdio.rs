//! STDIO transport implementation.
//!
//! Standard input/output transport for local development. A client on stdio
//! has no way to present a payment, so this transport only starts in
//! testing mode.

use rmcp::ServiceExt;
use tracing::{info, warn};

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        Self::ensure_allowed(&server)?;
        warn!("STDIO transport serves tools without payment (testing mode)");
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }

    fn ensure_allowed(server: &McpServer) -> TransportResult<()> {
        if server.config().payment.testing_mode {
            Ok(())
        } else {
            Err(TransportError::init(
                "STDIO transport cannot enforce payment; set D402_TESTING_MODE=true or use MCP_TRANSPORT=http",
            ))
        }
    }
}
