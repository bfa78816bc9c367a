//! # graphql-mcp
//!
//! MCP (Model Context Protocol) server that generates GraphQL operations from
//! live schemas.
//!
//! Agents register endpoints, inspect their schemas and ask for complete
//! operations for a root field. Each request introspects the endpoint afresh
//! and runs the synthesizer from `graphql-synth` over the result.
//!
//! ## Architecture
//!
//! The server can run in two modes:
//!
//! 1. **Standalone binary** (`graphql-mcp`) - discovers its config from the
//!    working directory
//! 2. **CLI subcommand** (`graphql mcp`) - optionally with an explicit config
//!
//! Both share one [`McpService`], which owns the [`EndpointRegistry`], behind
//! the tool router.
//!
//! ## Example
//!
//! ```no_run
//! use graphql_mcp::GraphQLMcpServer;
//!
//! # async fn run() -> anyhow::Result<()> {
//! GraphQLMcpServer::run_standalone(std::path::Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```

mod registry;
pub mod report;
mod service;
mod tools;
mod types;

pub use registry::{EndpointInfo, EndpointRegistry, EndpointStats};
pub use service::{
    fetch_schema, generate_operation, EndpointSummary, McpService, OperationRequest, ToolError,
};
pub use tools::GraphQLToolRouter;
pub use types::{
    CompareSchemasParams, GenerateOperationParams, IntrospectSchemaParams, RegisterEndpointParams,
    RemoveEndpointParams,
};

use anyhow::{Context, Result};
use graphql_config::McpConfig;
use rmcp::ServiceExt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// MCP server for GraphQL operation generation
pub struct GraphQLMcpServer {
    service: Arc<Mutex<McpService>>,
}

impl GraphQLMcpServer {
    /// Create a server whose registry is seeded from `config`
    #[must_use]
    pub fn new(config: &McpConfig) -> Self {
        Self {
            service: Arc::new(Mutex::new(McpService::from_config(config))),
        }
    }

    /// Discover a config file from `workspace` upwards and serve on stdio
    pub async fn run_standalone(workspace: &Path) -> Result<()> {
        tracing::info!("Starting GraphQL MCP server in standalone mode");
        tracing::info!("Workspace: {}", workspace.display());

        let (config, path) = graphql_config::discover_config(workspace)
            .context("Failed to load MCP configuration")?;
        match path {
            Some(path) => tracing::info!(path = %path.display(), "Using config file"),
            None => tracing::info!("No config file found, starting with no endpoints"),
        }

        Self::new(&config).run().await
    }

    /// Serve the tools over stdio until the client disconnects
    pub async fn run(self) -> Result<()> {
        let endpoints = self.service.lock().await.registry().len();
        let router = GraphQLToolRouter::new(self.service);

        let transport = rmcp::transport::stdio();
        let server = router
            .serve(transport)
            .await
            .context("Failed to start MCP transport")?;

        tracing::info!(endpoints, "GraphQL MCP server running");

        server.waiting().await?;

        tracing::info!("GraphQL MCP server stopped");
        Ok(())
    }
}

impl Default for GraphQLMcpServer {
    fn default() -> Self {
        Self::new(&McpConfig::default())
    }
}

/// Initialize logging to stderr; stdout carries the MCP protocol.
///
/// Reads `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .try_init();
}
