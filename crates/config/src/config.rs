use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default request timeout for endpoints, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default selection depth for generated operations.
pub const DEFAULT_DEPTH: usize = 3;

/// Top-level server configuration.
///
/// ```yaml
/// endpoints:
///   github:
///     url: https://api.github.com/graphql
///     headers: { Authorization: "Bearer ..." }
/// synthesis:
///   defaultDepth: 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpConfig {
    /// Endpoints registered at start-up, keyed by name.
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointConfig>,

    #[serde(default)]
    pub synthesis: SynthesisSettings,
}

impl McpConfig {
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(name)
    }

    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

/// A GraphQL endpoint and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub url: String,

    /// Sent with every request, e.g. `Authorization`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retry attempts for transient failures.
    #[serde(default)]
    pub retry: u32,

    /// Whether mutation operations may be generated against this endpoint.
    #[serde(default)]
    pub allow_mutations: bool,

    /// Prefix of the per-operation tool names (`{prefix}_{field}`); the
    /// endpoint name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_prefix: Option<String>,
}

impl EndpointConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
            retry: 0,
            allow_mutations: false,
            tool_prefix: None,
        }
    }
}

/// Defaults applied to operation generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisSettings {
    #[serde(default = "default_depth")]
    pub default_depth: usize,

    #[serde(default = "default_true")]
    pub include_all_scalars: bool,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
            include_all_scalars: true,
        }
    }
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_depth() -> usize {
    DEFAULT_DEPTH
}

const fn default_true() -> bool {
    true
}
