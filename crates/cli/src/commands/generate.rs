//! `graphql generate`: print a complete operation for a root field.

use super::common::SchemaSource;
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_synth::{AssembledOperation, OperationAssembler, OperationKind, SynthesisOptions};

pub struct GenerateArgs {
    pub field: String,
    pub source: SchemaSource,
    pub kind: OperationKind,
    pub name: Option<String>,
    pub depth: usize,
    pub include_all_scalars: bool,
    pub variables: Option<String>,
    pub format: OutputFormat,
}

pub async fn run(args: GenerateArgs, output_opts: OutputOptions) -> Result<()> {
    let variables = parse_variables(args.variables.as_deref())?;
    let schema = args.source.load(output_opts).await?;

    let options = SynthesisOptions {
        max_depth: args.depth,
        include_all_scalars: args.include_all_scalars,
    };
    let operation = OperationAssembler::new(&schema, options)?.assemble(
        args.kind,
        args.name.as_deref(),
        &args.field,
        &variables,
    )?;

    match args.format {
        OutputFormat::Human => print_human(&operation, output_opts),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&operation).context("Failed to serialize operation")?
        ),
    }
    Ok(())
}

fn parse_variables(raw: Option<&str>) -> Result<serde_json::Map<String, serde_json::Value>> {
    let Some(raw) = raw else {
        return Ok(serde_json::Map::new());
    };
    match serde_json::from_str(raw).context("--variables must be valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("--variables must be a JSON object"),
    }
}

/// The operation goes to stdout; everything else to stderr so the output
/// can be piped.
fn print_human(operation: &AssembledOperation, output_opts: OutputOptions) {
    println!("{}", operation.query_text);

    if output_opts.show_info {
        let variables = operation.variables.len();
        eprintln!(
            "{} Generated {} {} (max depth {}, {} variable{})",
            "✓".green(),
            operation.kind,
            operation.operation_name.cyan(),
            operation.max_depth,
            variables,
            if variables == 1 { "" } else { "s" }
        );
    }

    for name in &operation.missing_required {
        eprintln!(
            "{} required variable {} has no value",
            "warning:".yellow().bold(),
            format!("${name}").cyan()
        );
    }
    for name in &operation.unknown_supplied {
        eprintln!(
            "{} supplied value {} matches no argument of {}",
            "warning:".yellow().bold(),
            name.cyan(),
            operation.root_field.cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        assert!(parse_variables(None).unwrap().is_empty());
        assert_eq!(parse_variables(Some(r#"{"id": 1}"#)).unwrap()["id"], 1);
        assert!(parse_variables(Some("[1]")).is_err());
        assert!(parse_variables(Some("{")).is_err());
    }
}
