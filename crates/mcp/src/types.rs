//! MCP tool parameter types
//!
//! These define the interface between AI agents and the server. Optional
//! fields fall back to the configured defaults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for the register_endpoint tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegisterEndpointParams {
    #[schemars(description = "Unique name used to refer to the endpoint in other tools")]
    pub name: String,

    #[schemars(description = "GraphQL endpoint URL (http:// or https://)")]
    pub url: String,

    #[schemars(description = "HTTP headers sent with every request, e.g. Authorization")]
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[schemars(description = "Request timeout in seconds (default 30)")]
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[schemars(description = "Retry attempts for network failures and 5xx responses (default 0)")]
    #[serde(default)]
    pub retry: Option<u32>,

    #[schemars(description = "Allow generating mutation operations for this endpoint (default false)")]
    #[serde(default)]
    pub allow_mutations: bool,

    #[schemars(
        description = "Prefix for the per-operation tool names listed by introspect_schema (defaults to the endpoint name)"
    )]
    #[serde(default)]
    pub tool_prefix: Option<String>,
}

/// Parameters for the remove_endpoint tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveEndpointParams {
    #[schemars(description = "Name of the endpoint to remove")]
    pub name: String,
}

/// Parameters for the introspect_schema tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IntrospectSchemaParams {
    #[schemars(description = "Name of a registered endpoint")]
    pub endpoint: String,

    #[schemars(description = "Also list mutation operations (default true)")]
    #[serde(default = "default_true")]
    pub include_mutations: bool,
}

/// Parameters for the compare_schemas tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompareSchemasParams {
    #[schemars(description = "Name of the first registered endpoint")]
    pub endpoint_a: String,

    #[schemars(description = "Name of the second registered endpoint")]
    pub endpoint_b: String,
}

/// Parameters for the generate_operation tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateOperationParams {
    #[schemars(description = "Name of a registered endpoint")]
    pub endpoint: String,

    #[schemars(description = "Root field of the Query or Mutation type, e.g. `user`")]
    pub field: String,

    #[schemars(description = "Operation kind: `query` (default), `mutation` or `subscription`")]
    #[serde(default)]
    pub operation_type: Option<String>,

    #[schemars(description = "Operation name (defaults to the root field name)")]
    #[serde(default)]
    pub operation_name: Option<String>,

    #[schemars(description = "Maximum selection depth, 0 to 15 (defaults to the configured depth)")]
    #[serde(default)]
    pub max_depth: Option<usize>,

    #[schemars(description = "Select scalar and enum fields (default true)")]
    #[serde(default)]
    pub include_all_scalars: Option<bool>,

    #[schemars(
        description = "Variable values as a JSON object (or a string containing one); used to flag missing or unknown variables"
    )]
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

const fn default_true() -> bool {
    true
}
