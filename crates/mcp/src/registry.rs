//! Registered GraphQL endpoints and their access statistics.
//!
//! The registry is an ordinary value owned by [`crate::McpService`]; there is
//! no process-wide instance.

use graphql_config::EndpointConfig;
use graphql_synth::{OperationKind, OperationSummary};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

/// A GraphQL endpoint the server may introspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub name: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
    pub retry: u32,
    pub allow_mutations: bool,
    pub tool_prefix: Option<String>,
}

impl EndpointInfo {
    #[must_use]
    pub fn from_config(name: &str, config: &EndpointConfig) -> Self {
        Self {
            name: name.to_string(),
            url: config.url.clone(),
            headers: config.headers.clone(),
            timeout: Duration::from_secs(config.timeout),
            retry: config.retry,
            allow_mutations: config.allow_mutations,
            tool_prefix: config.tool_prefix.clone(),
        }
    }

    /// Header names only; values may carry credentials.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// The tool prefix, falling back to the endpoint name.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.tool_prefix.as_deref().unwrap_or(&self.name)
    }

    /// Per-operation tool names: `{prefix}_{field}` for queries and
    /// `{prefix}_mutation_{field}` for mutations. Mutations are only named
    /// when the endpoint allows them; subscriptions never are.
    #[must_use]
    pub fn tool_names(&self, operations: &[OperationSummary]) -> Vec<String> {
        let prefix = self.prefix();
        operations
            .iter()
            .filter_map(|op| match op.kind {
                OperationKind::Query => Some(format!("{prefix}_{}", op.name)),
                OperationKind::Mutation if self.allow_mutations => {
                    Some(format!("{prefix}_mutation_{}", op.name))
                }
                OperationKind::Mutation | OperationKind::Subscription => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointStats {
    pub registered_at: SystemTime,
    pub last_accessed: Option<SystemTime>,
    pub access_count: u64,
    pub success_count: u64,
    pub error_count: u64,
}

impl EndpointStats {
    fn new() -> Self {
        Self {
            registered_at: SystemTime::now(),
            last_accessed: None,
            access_count: 0,
            success_count: 0,
            error_count: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    info: EndpointInfo,
    stats: EndpointStats,
}

#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    entries: BTreeMap<String, Entry>,
}

impl EndpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding every endpoint of `config`.
    #[must_use]
    pub fn from_config(config: &graphql_config::McpConfig) -> Self {
        let mut registry = Self::new();
        for (name, endpoint) in &config.endpoints {
            registry.register(EndpointInfo::from_config(name, endpoint));
        }
        registry
    }

    /// Adds or replaces an endpoint. Returns `true` if an entry with the same
    /// name was replaced; its statistics are reset.
    pub fn register(&mut self, info: EndpointInfo) -> bool {
        let name = info.name.clone();
        let replaced = self
            .entries
            .insert(
                name.clone(),
                Entry {
                    info,
                    stats: EndpointStats::new(),
                },
            )
            .is_some();
        tracing::info!(endpoint = %name, replaced, "Endpoint registered");
        replaced
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EndpointInfo> {
        self.entries.get(name).map(|entry| &entry.info)
    }

    pub fn remove(&mut self, name: &str) -> Option<EndpointInfo> {
        let removed = self.entries.remove(name).map(|entry| entry.info);
        if removed.is_some() {
            tracing::info!(endpoint = %name, "Endpoint removed");
        }
        removed
    }

    /// Endpoints in name order.
    #[must_use]
    pub fn list(&self) -> Vec<&EndpointInfo> {
        self.entries.values().map(|entry| &entry.info).collect()
    }

    /// Counts one access. Unknown names are ignored.
    pub fn record_access(&mut self, name: &str, success: bool) {
        let Some(entry) = self.entries.get_mut(name) else {
            return;
        };
        let stats = &mut entry.stats;
        stats.last_accessed = Some(SystemTime::now());
        stats.access_count += 1;
        if success {
            stats.success_count += 1;
        } else {
            stats.error_count += 1;
        }
    }

    #[must_use]
    pub fn stats(&self, name: &str) -> Option<EndpointStats> {
        self.entries.get(name).map(|entry| entry.stats)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
