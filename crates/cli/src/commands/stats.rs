use super::common::SchemaSource;
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_synth::{list_operations, ComplexityRating, OperationSummary, SchemaStats};
use serde::Serialize;

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: SchemaStats,
    #[serde(rename = "rootFields")]
    root_fields: Vec<OperationSummary>,
}

pub async fn run(
    source: SchemaSource,
    include_mutations: bool,
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<()> {
    let schema = source.load(output_opts).await?;
    let report = StatsReport {
        stats: SchemaStats::from_graph(&schema),
        root_fields: list_operations(&schema, include_mutations),
    };

    match format {
        OutputFormat::Human => print_human(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize stats")?
        ),
    }
    Ok(())
}

fn print_human(report: &StatsReport) {
    let stats = &report.stats;

    println!("{}", "Schema Statistics".bold().underline());
    println!();
    println!("  {:<18} {}", "Types:", stats.types.to_string().cyan());
    println!("  {:<18} {}", "Fields:", stats.fields.to_string().cyan());
    println!("  {:<18} {}", "Operations:", stats.operations.to_string().cyan());
    println!(
        "  {:<18} {}/100 ({})",
        "Complexity:",
        stats.complexity_score.to_string().cyan(),
        colored_rating(stats.rating)
    );

    if report.root_fields.is_empty() {
        return;
    }

    println!();
    println!("{}", "Root Fields".bold().underline());
    println!();
    for op in &report.root_fields {
        let line = format!("  {:<9} {}", op.kind.as_str(), op.signature());
        if op.is_deprecated {
            println!("{} {}", line.dimmed(), "(deprecated)".yellow());
        } else {
            println!("{line}");
        }
    }
}

fn colored_rating(rating: ComplexityRating) -> colored::ColoredString {
    match rating {
        ComplexityRating::Simple => rating.as_str().green(),
        ComplexityRating::Moderate => rating.as_str().cyan(),
        ComplexityRating::Complex => rating.as_str().yellow(),
        ComplexityRating::VeryComplex => rating.as_str().red(),
    }
}
