//! Schema-related CLI commands.

use super::common::RequestArgs;
use crate::progress::spinner;
use crate::OutputOptions;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

/// Schema subcommands.
#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Download schema from a remote GraphQL endpoint via introspection
    ///
    /// Writes the raw introspection JSON, which `generate --schema` and
    /// `stats --schema` accept.
    Download {
        /// GraphQL endpoint URL to introspect
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        request: RequestArgs,
    },
}

/// Run a schema subcommand.
pub async fn run(command: SchemaCommands, output_opts: OutputOptions) -> Result<()> {
    match command {
        SchemaCommands::Download {
            url,
            output,
            request,
        } => run_download(&url, output, &request, output_opts).await,
    }
}

async fn run_download(
    url: &str,
    output: Option<PathBuf>,
    request: &RequestArgs,
    output_opts: OutputOptions,
) -> Result<()> {
    let start_time = std::time::Instant::now();
    let client = request.client()?;

    let pb = spinner(&format!("Introspecting {url}..."), output_opts.show_progress);
    let response = client.execute_raw(url).await;
    pb.finish_and_clear();

    let response = response.with_context(|| format!("Failed to fetch schema from {url}"))?;
    // Reject error payloads before writing anything.
    graphql_introspect::IntrospectionResponse::from_value(response.clone())
        .with_context(|| format!("{url} did not return an introspection result"))?;

    let content = serde_json::to_string_pretty(&response)
        .context("Failed to serialize introspection response")?;

    if let Some(path) = output {
        std::fs::write(&path, &content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;

        if output_opts.show_info {
            println!(
                "{} Schema downloaded to {}",
                "✓".green(),
                path.display().to_string().cyan(),
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").context("Failed to write to stdout")?;
    }

    Ok(())
}
