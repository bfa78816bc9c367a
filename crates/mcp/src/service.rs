//! Core MCP service that implements the tools' behavior
//!
//! The service owns the endpoint registry and the synthesis defaults. Schema
//! fetching is a free function so the registry lock is never held across
//! network I/O.

use crate::registry::{EndpointInfo, EndpointRegistry};
use crate::types::{GenerateOperationParams, RegisterEndpointParams};
use graphql_config::{McpConfig, SynthesisSettings, DEFAULT_TIMEOUT_SECS};
use graphql_introspect::IntrospectionClient;
use graphql_synth::{
    AssembledOperation, OperationAssembler, OperationKind, SchemaGraph, SynthError,
    SynthesisOptions,
};
use std::time::Duration;
use thiserror::Error;

/// Failures reported back to the agent as tool errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Endpoint '{0}' is not registered")]
    EndpointNotFound(String),

    #[error("Endpoint '{0}' does not allow mutations; register it with allow_mutations to enable them")]
    MutationNotAllowed(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Synth(#[from] SynthError),
}

impl ToolError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EndpointNotFound(_) => "EndpointNotFound",
            Self::MutationNotAllowed(_) => "MutationNotAllowed",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Synth(e) => e.kind(),
        }
    }
}

/// A fully validated generate_operation request.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub endpoint: String,
    pub kind: OperationKind,
    pub field: String,
    pub operation_name: Option<String>,
    pub options: SynthesisOptions,
    pub variables: serde_json::Map<String, serde_json::Value>,
}

/// One row of the endpoint listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSummary {
    pub name: String,
    pub url: String,
    pub header_names: Vec<String>,
    pub allow_mutations: bool,
    pub tool_prefix: Option<String>,
    pub access_count: u64,
    pub error_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct McpService {
    registry: EndpointRegistry,
    settings: SynthesisSettings,
}

impl McpService {
    #[must_use]
    pub fn new(settings: SynthesisSettings) -> Self {
        Self {
            registry: EndpointRegistry::new(),
            settings,
        }
    }

    /// Seeds the registry with the configured endpoints.
    #[must_use]
    pub fn from_config(config: &McpConfig) -> Self {
        Self {
            registry: EndpointRegistry::from_config(config),
            settings: config.synthesis,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn settings(&self) -> SynthesisSettings {
        self.settings
    }

    /// Validates and registers an endpoint. Returns whether an existing
    /// endpoint was replaced.
    pub fn register_endpoint(&mut self, params: RegisterEndpointParams) -> Result<bool, ToolError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(ToolError::InvalidArgument(
                "Endpoint name must not be empty".to_string(),
            ));
        }
        if !(params.url.starts_with("http://") || params.url.starts_with("https://")) {
            return Err(ToolError::InvalidArgument(format!(
                "Invalid URL '{}': expected http:// or https://",
                params.url
            )));
        }

        let timeout = params.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(ToolError::InvalidArgument(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(self.registry.register(EndpointInfo {
            name: name.to_string(),
            url: params.url,
            headers: params.headers,
            timeout: Duration::from_secs(timeout),
            retry: params.retry.unwrap_or(0),
            allow_mutations: params.allow_mutations,
            tool_prefix: params.tool_prefix.filter(|p| !p.trim().is_empty()),
        }))
    }

    pub fn remove_endpoint(&mut self, name: &str) -> Result<EndpointInfo, ToolError> {
        self.registry
            .remove(name)
            .ok_or_else(|| ToolError::EndpointNotFound(name.to_string()))
    }

    pub fn endpoint(&self, name: &str) -> Result<EndpointInfo, ToolError> {
        self.registry
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::EndpointNotFound(name.to_string()))
    }

    #[must_use]
    pub fn list_endpoints(&self) -> Vec<EndpointSummary> {
        self.registry
            .list()
            .into_iter()
            .map(|info| {
                let stats = self.registry.stats(&info.name);
                EndpointSummary {
                    name: info.name.clone(),
                    url: info.url.clone(),
                    header_names: info.header_names().map(str::to_string).collect(),
                    allow_mutations: info.allow_mutations,
                    tool_prefix: info.tool_prefix.clone(),
                    access_count: stats.map_or(0, |s| s.access_count),
                    error_count: stats.map_or(0, |s| s.error_count),
                }
            })
            .collect()
    }

    pub fn record_access(&mut self, name: &str, success: bool) {
        self.registry.record_access(name, success);
    }

    /// Resolves defaults and checks the request against the endpoint's
    /// permissions. Nothing is fetched.
    pub fn prepare_operation(
        &self,
        params: GenerateOperationParams,
    ) -> Result<OperationRequest, ToolError> {
        let endpoint = self.endpoint(&params.endpoint)?;

        let kind = params
            .operation_type
            .as_deref()
            .map_or(Ok(OperationKind::Query), str::parse)
            .map_err(ToolError::InvalidArgument)?;
        if kind == OperationKind::Mutation && !endpoint.allow_mutations {
            return Err(ToolError::MutationNotAllowed(endpoint.name));
        }

        let field = params.field.trim();
        if field.is_empty() {
            return Err(ToolError::InvalidArgument(
                "field must name a root operation field".to_string(),
            ));
        }

        Ok(OperationRequest {
            endpoint: endpoint.name,
            kind,
            field: field.to_string(),
            operation_name: params.operation_name.filter(|n| !n.trim().is_empty()),
            options: SynthesisOptions {
                max_depth: params.max_depth.unwrap_or(self.settings.default_depth),
                include_all_scalars: params
                    .include_all_scalars
                    .unwrap_or(self.settings.include_all_scalars),
            },
            variables: parse_variables(params.variables)?,
        })
    }
}

/// Accepts a JSON object, or a string holding one.
fn parse_variables(
    value: Option<serde_json::Value>,
) -> Result<serde_json::Map<String, serde_json::Value>, ToolError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(serde_json::Map::new()),
        Some(serde_json::Value::Object(map)) => Ok(map),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => {
            Ok(serde_json::Map::new())
        }
        Some(serde_json::Value::String(text)) => match serde_json::from_str(&text) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(ToolError::InvalidArgument(
                "variables must be a JSON object".to_string(),
            )),
            Err(e) => Err(ToolError::InvalidArgument(format!(
                "variables is not valid JSON: {e}"
            ))),
        },
        Some(_) => Err(ToolError::InvalidArgument(
            "variables must be a JSON object".to_string(),
        )),
    }
}

/// Introspects `endpoint` and builds a fresh schema graph.
#[tracing::instrument(skip(endpoint), fields(endpoint = %endpoint.name))]
pub async fn fetch_schema(endpoint: &EndpointInfo) -> Result<SchemaGraph, SynthError> {
    let client = IntrospectionClient::new()
        .with_headers(endpoint.headers.clone())
        .with_timeout(endpoint.timeout)
        .with_retries(endpoint.retry);
    let response = client.execute(&endpoint.url).await?;
    SchemaGraph::build(&response)
}

/// Assembles the requested operation over an already fetched schema.
pub fn generate_operation(
    schema: &SchemaGraph,
    request: &OperationRequest,
) -> Result<AssembledOperation, ToolError> {
    let assembler = OperationAssembler::new(schema, request.options)?;
    Ok(assembler.assemble(
        request.kind,
        request.operation_name.as_deref(),
        &request.field,
        &request.variables,
    )?)
}
