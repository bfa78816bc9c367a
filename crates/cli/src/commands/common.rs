//! Schema loading shared by the commands that operate on a schema.

use crate::progress::spinner;
use crate::OutputOptions;
use anyhow::{Context, Result};
use clap::Args;
use graphql_introspect::{IntrospectionClient, DEFAULT_TIMEOUT_SECS};
use graphql_synth::SchemaGraph;
use std::path::PathBuf;
use std::time::Duration;

/// Where to obtain the schema from: a live endpoint or a saved
/// introspection JSON file.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false, id = "schema_source")]
pub struct SchemaSource {
    /// GraphQL endpoint URL to introspect
    #[arg(long, value_name = "URL", group = "schema_source")]
    pub url: Option<String>,

    /// Introspection JSON file (as written by `graphql schema download`)
    #[arg(long = "schema", short = 's', value_name = "FILE", group = "schema_source")]
    pub schema_file: Option<PathBuf>,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// HTTP options for introspection requests.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// HTTP headers to include in the request (can be specified multiple times)
    /// Format: "Header-Name: Header-Value"
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of retry attempts on failure
    #[arg(long, default_value_t = 0)]
    pub retry: u32,
}

impl RequestArgs {
    pub fn client(&self) -> Result<IntrospectionClient> {
        let headers = self
            .headers
            .iter()
            .map(|h| parse_header(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(IntrospectionClient::new()
            .with_headers(headers)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retries(self.retry))
    }
}

impl SchemaSource {
    /// Fetches or reads the schema and builds its graph.
    pub async fn load(&self, output: OutputOptions) -> Result<SchemaGraph> {
        if let Some(path) = &self.schema_file {
            tracing::debug!(path = %path.display(), "Reading introspection file");
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return SchemaGraph::from_json_str(&json)
                .with_context(|| format!("Invalid introspection payload in {}", path.display()));
        }

        let url = self
            .url
            .as_deref()
            .context("Either --url or --schema is required")?;
        let client = self.request.client()?;

        let pb = spinner(&format!("Introspecting {url}..."), output.show_progress);
        let response = client.execute(url).await;
        pb.finish_and_clear();

        let response = response.with_context(|| format!("Failed to fetch schema from {url}"))?;
        Ok(SchemaGraph::build(&response)?)
    }
}

/// Parses a header string in "Name: Value" format.
pub fn parse_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'");
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Header name cannot be empty");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_valid() {
        let (name, value) = parse_header("Authorization: Bearer token").unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer token");
    }

    #[test]
    fn test_parse_header_with_colons_in_value() {
        let (name, value) = parse_header("X-Custom: value:with:colons").unwrap();
        assert_eq!(name, "X-Custom");
        assert_eq!(value, "value:with:colons");
    }

    #[test]
    fn test_parse_header_with_whitespace() {
        let (name, value) = parse_header("  Content-Type  :  application/json  ").unwrap();
        assert_eq!(name, "Content-Type");
        assert_eq!(value, "application/json");
    }

    #[test]
    fn test_parse_header_invalid() {
        assert!(parse_header("InvalidHeader").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        std::fs::write(
            file.path(),
            r#"{"data":{"__schema":{"queryType":{"name":"Query"},"types":[
              {"kind":"OBJECT","name":"Query","fields":[{"name":"ok","args":[],"type":{"kind":"SCALAR","name":"Boolean"}}]},
              {"kind":"SCALAR","name":"Boolean"}]}}}"#,
        )
        .unwrap();

        let source = SchemaSource {
            url: None,
            schema_file: Some(file.path().to_path_buf()),
            request: RequestArgs {
                headers: Vec::new(),
                timeout: 30,
                retry: 0,
            },
        };
        let output = OutputOptions {
            show_progress: false,
            show_info: false,
        };
        let schema = source.load(output).await.unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let source = SchemaSource {
            url: None,
            schema_file: Some(PathBuf::from("/nonexistent/schema.json")),
            request: RequestArgs {
                headers: Vec::new(),
                timeout: 30,
                retry: 0,
            },
        };
        let output = OutputOptions {
            show_progress: false,
            show_info: false,
        };
        let err = source.load(output).await.unwrap_err();
        assert!(err.chain().any(|c| c.is::<std::io::Error>()));
    }
}
