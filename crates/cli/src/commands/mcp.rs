use anyhow::{Context, Result};
use graphql_mcp::GraphQLMcpServer;
use std::path::PathBuf;

/// Serve the MCP tools on stdio.
///
/// With `--config` the file must exist and parse; otherwise the config is
/// discovered from the current directory upwards and may be absent.
pub async fn run(config: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config {
        tracing::info!(path = %path.display(), "Using config file");
        let config = graphql_config::load_config(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        return GraphQLMcpServer::new(&config).run().await;
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    GraphQLMcpServer::run_standalone(&cwd).await
}
