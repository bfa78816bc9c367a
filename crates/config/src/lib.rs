//! Configuration for the GraphQL MCP server: the endpoints registered at
//! start-up and the defaults used when generating operations.
//!
//! Files are discovered by walking up from a start directory; see
//! [`CONFIG_FILES`] for the accepted names.

mod config;
mod error;
mod loader;

pub use config::{
    EndpointConfig, McpConfig, SynthesisSettings, DEFAULT_DEPTH, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, Result};
pub use loader::{discover_config, find_config, load_config, load_config_from_str, CONFIG_FILES};
