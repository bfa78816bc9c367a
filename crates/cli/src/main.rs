mod commands;
mod exit_code;
mod progress;

use clap::{Parser, Subcommand};
use colored::Colorize;
use exit_code::ExitCode;
use graphql_synth::{OperationKind, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql")]
#[command(about = "Generate GraphQL operations from an introspected schema", long_about = None)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Schema-related commands (download, etc.)
    Schema {
        #[command(subcommand)]
        command: commands::schema::SchemaCommands,
    },

    /// Generate an operation for a root field
    ///
    /// The selection set is built from the schema up to `--depth` levels,
    /// and every argument of the root field becomes a variable.
    Generate {
        /// Root field to select (e.g. "user")
        #[arg(value_name = "FIELD")]
        field: String,

        #[command(flatten)]
        source: commands::common::SchemaSource,

        /// Generate a mutation instead of a query
        #[arg(long, conflicts_with = "subscription")]
        mutation: bool,

        /// Generate a subscription instead of a query
        #[arg(long)]
        subscription: bool,

        /// Operation name (defaults to the field name)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Maximum selection depth (1-15)
        #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,

        /// Only select object fields, skipping scalar and enum leaves
        #[arg(long)]
        no_scalars: bool,

        /// Variable values as a JSON object, checked against the field's arguments
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Display statistics and root fields of a schema
    Stats {
        #[command(flatten)]
        source: commands::common::SchemaSource,

        /// Leave mutation fields out of the listing
        #[arg(long)]
        no_mutations: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Start an MCP server for AI agent integration
    ///
    /// Exposes endpoint registration, schema introspection and operation
    /// generation as tools. The server communicates via stdio.
    Mcp {
        /// Config file (discovered from the current directory if omitted)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout belongs to the protocol, and the server sets up its own
    // ANSI-free subscriber.
    if matches!(cli.command, Commands::Mcp { .. }) {
        graphql_mcp::init_tracing();
    } else {
        init_tracing();
    }

    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet && !cli.no_progress,
        show_info: !cli.quiet,
    };

    let result = match cli.command {
        Commands::Schema { command } => commands::schema::run(command, output_opts).await,
        Commands::Generate {
            field,
            source,
            mutation,
            subscription,
            name,
            depth,
            no_scalars,
            variables,
            format,
        } => {
            let args = commands::generate::GenerateArgs {
                field,
                source,
                kind: match (mutation, subscription) {
                    (true, _) => OperationKind::Mutation,
                    (_, true) => OperationKind::Subscription,
                    _ => OperationKind::Query,
                },
                name,
                depth,
                include_all_scalars: !no_scalars,
                variables,
                format,
            };
            commands::generate::run(args, output_opts).await
        }
        Commands::Stats {
            source,
            no_mutations,
            format,
        } => commands::stats::run(source, !no_mutations, format, output_opts).await,
        Commands::Mcp { config } => commands::mcp::run(config).await,
    };

    if let Err(error) = result {
        let code = ExitCode::for_error(&error);
        eprintln!("{} {error}", "error:".red().bold());
        for cause in error.chain().skip(1) {
            eprintln!("  {} {cause}", "caused by:".dimmed());
        }
        tracing::debug!(%code, "Exiting");
        code.exit();
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}


#[cfg(test)]
mod color_tests {
    use super::configure_colors;
    use colored::control::{self, SHOULD_COLORIZE};
    use std::sync::Mutex;

    // Mutex to serialize tests that modify global state (env vars and color override)
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn with_clean_env<F: FnOnce()>(f: F) {
        let _lock = TEST_MUTEX.lock().unwrap();

        // Save and clear color-related env vars
        let saved_no_color = std::env::var_os("NO_COLOR");
        let saved_clicolor = std::env::var_os("CLICOLOR");
        let saved_clicolor_force = std::env::var_os("CLICOLOR_FORCE");

        std::env::remove_var("NO_COLOR");
        std::env::remove_var("CLICOLOR");
        std::env::remove_var("CLICOLOR_FORCE");

        // Reset color override
        control::unset_override();

        f();

        // Restore env vars
        control::unset_override();
        if let Some(v) = saved_no_color {
            std::env::set_var("NO_COLOR", v);
        }
        if let Some(v) = saved_clicolor {
            std::env::set_var("CLICOLOR", v);
        }
        if let Some(v) = saved_clicolor_force {
            std::env::set_var("CLICOLOR_FORCE", v);
        }
    }

    #[test]
    fn color_flag_forces_colors_on() {
        with_clean_env(|| {
            configure_colors(true, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_flag_forces_colors_off() {
        with_clean_env(|| {
            configure_colors(false, true);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn color_flag_overrides_no_color_env() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            configure_colors(true, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_env_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_force_enables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }


    #[test]
    fn clicolor_zero_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR", "0");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_env_takes_priority_over_clicolor_force() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }
}
