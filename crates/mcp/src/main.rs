//! Standalone GraphQL MCP Server binary
//!
//! This is a thin wrapper that starts the GraphQL MCP server.
//! For CLI usage with an explicit config file, use `graphql mcp` instead.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    graphql_mcp::init_tracing();
    let workspace = std::env::current_dir().unwrap_or_default();
    graphql_mcp::GraphQLMcpServer::run_standalone(&workspace).await
}
