use crate::{ConfigError, McpConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Highest accepted `synthesis.defaultDepth`.
const MAX_DEFAULT_DEPTH: usize = 15;

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".graphql-mcp.yml",
    ".graphql-mcp.yaml",
    ".graphql-mcp.json",
    "graphql-mcp.config.yml",
    "graphql-mcp.config.yaml",
    "graphql-mcp.config.json",
];

/// Find a config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config from the specified path.
/// Automatically detects the format based on file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<McpConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        endpoints = config.endpoint_count(),
        default_depth = config.synthesis.default_depth,
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<McpConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    tracing::debug!(extension, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

/// Discover a config from `start_dir` upwards and load it, falling back to
/// the defaults when none exists.
pub fn discover_config(start_dir: &Path) -> Result<(McpConfig, Option<PathBuf>)> {
    match find_config(start_dir)? {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => Ok((McpConfig::default(), None)),
    }
}

fn parse_yaml(contents: &str, path: &Path) -> Result<McpConfig> {
    // An empty YAML document means "all defaults".
    if contents.trim().is_empty() {
        return Ok(McpConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<McpConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

#[tracing::instrument(skip(config, path), fields(path = %path.display(), endpoints = config.endpoint_count()))]
fn validate_config(config: &McpConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    for (name, endpoint) in &config.endpoints {
        tracing::trace!(endpoint = name, "Validating endpoint config");

        if name.trim().is_empty() {
            return Err(invalid("Endpoint names must not be empty".to_string()));
        }
        if !(endpoint.url.starts_with("http://") || endpoint.url.starts_with("https://")) {
            return Err(invalid(format!(
                "Endpoint '{name}' has invalid url '{}' (expected http:// or https://)",
                endpoint.url
            )));
        }
        if endpoint.timeout == 0 {
            return Err(invalid(format!("Endpoint '{name}' has a timeout of 0 seconds")));
        }
        if endpoint
            .tool_prefix
            .as_deref()
            .is_some_and(|prefix| prefix.trim().is_empty())
        {
            return Err(invalid(format!("Endpoint '{name}' has an empty toolPrefix")));
        }
    }

    if config.synthesis.default_depth > MAX_DEFAULT_DEPTH {
        return Err(invalid(format!(
            "synthesis.defaultDepth must be between 0 and {MAX_DEFAULT_DEPTH}, got {}",
            config.synthesis.default_depth
        )));
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
