//! Markdown rendering of tool results.

use crate::service::{EndpointSummary, ToolError};
use graphql_synth::{AssembledOperation, OperationSummary, SchemaComparison, SchemaStats};
use std::fmt::Write;

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// `**Error** (`kind`): message`
#[must_use]
pub fn render_error(error: &ToolError) -> String {
    format!("**Error** (`{}`): {error}", error.kind())
}

#[must_use]
pub fn render_operation(operation: &AssembledOperation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "## Generated {}: `{}`\n",
        operation.kind, operation.operation_name
    );
    let _ = writeln!(out, "```graphql\n{}\n```\n", operation.query_text);

    out.push_str("### Variables\n\n");
    if operation.variables.is_empty() {
        out.push_str("_No variables._\n\n");
    } else {
        out.push_str("| Variable | Type | Required | Supplied |\n");
        out.push_str("|----------|------|----------|----------|\n");
        for variable in &operation.variables {
            let type_syntax = match &variable.default_value {
                Some(default) => format!("{} = {default}", variable.type_syntax),
                None => variable.type_syntax.clone(),
            };
            let _ = writeln!(
                out,
                "| `${}` | `{type_syntax}` | {} | {} |",
                variable.name,
                yes_no(variable.required),
                yes_no(variable.supplied)
            );
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "**Settings:** max depth {}, include all scalars: {}",
        operation.max_depth,
        yes_no(operation.include_all_scalars)
    );

    if operation.has_warnings() {
        out.push_str("\n### Warnings\n\n");
        for name in &operation.missing_required {
            let _ = writeln!(out, "- Required variable `${name}` has no value");
        }
        for name in &operation.unknown_supplied {
            let _ = writeln!(
                out,
                "- Supplied value `{name}` matches no argument of `{}`",
                operation.root_field
            );
        }
    }

    out
}

/// Counts, rating and root operations, followed by the per-operation tool
/// names derived from the endpoint's prefix.
#[must_use]
pub fn render_schema_overview(
    endpoint: &str,
    stats: &SchemaStats,
    operations: &[OperationSummary],
    tool_names: &[String],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Schema: `{endpoint}`\n");
    let _ = writeln!(out, "- **Types:** {}", stats.types);
    let _ = writeln!(out, "- **Fields:** {}", stats.fields);
    let _ = writeln!(out, "- **Operations:** {}", stats.operations);
    let _ = writeln!(
        out,
        "- **Complexity:** {} ({}/100)",
        stats.rating, stats.complexity_score
    );

    if operations.is_empty() {
        out.push_str("\n_No root operations._\n");
        return out;
    }

    let mut current_kind = None;
    for operation in operations {
        if current_kind != Some(operation.kind) {
            current_kind = Some(operation.kind);
            let heading = match operation.kind {
                graphql_synth::OperationKind::Query => "Queries",
                graphql_synth::OperationKind::Mutation => "Mutations",
                graphql_synth::OperationKind::Subscription => "Subscriptions",
            };
            let _ = writeln!(out, "\n### {heading}\n");
        }
        let deprecated = if operation.is_deprecated {
            " _(deprecated)_"
        } else {
            ""
        };
        let _ = write!(out, "- `{}`{deprecated}", operation.signature());
        if let Some(description) = operation
            .description
            .as_deref()
            .and_then(|d| d.lines().next())
            .filter(|d| !d.trim().is_empty())
        {
            let _ = write!(out, " - {description}");
        }
        out.push('\n');
    }

    if !tool_names.is_empty() {
        out.push_str("\n### Operation tools\n\n");
        out.push_str("Each name maps to `generate_operation` for that root field.\n\n");
        for name in tool_names {
            let _ = writeln!(out, "- `{name}`");
        }
    }
    out
}

/// Side-by-side type overlap of two endpoints' schemas.
#[must_use]
pub fn render_schema_comparison(
    endpoint_a: &str,
    endpoint_b: &str,
    comparison: &SchemaComparison,
) -> String {
    let mut out = format!("## Schema comparison: `{endpoint_a}` vs `{endpoint_b}`\n\n");
    out.push_str("| | Types |\n|---|---|\n");
    let _ = writeln!(out, "| `{endpoint_a}` | {} |", comparison.total_types_a);
    let _ = writeln!(out, "| `{endpoint_b}` | {} |", comparison.total_types_b);
    let _ = writeln!(out, "| Common | {} |", comparison.common_types);
    let _ = writeln!(out, "| Only in `{endpoint_a}` | {} |", comparison.only_in_a.len());
    let _ = writeln!(out, "| Only in `{endpoint_b}` | {} |", comparison.only_in_b.len());
    let _ = writeln!(
        out,
        "\n**Similarity:** {:.2}% ({})",
        comparison.similarity_score,
        if comparison.are_compatible {
            "compatible"
        } else {
            "not compatible"
        }
    );

    for (endpoint, names) in [
        (endpoint_a, &comparison.only_in_a),
        (endpoint_b, &comparison.only_in_b),
    ] {
        if names.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n### Only in `{endpoint}`\n");
        let listed: Vec<_> = names.iter().map(|n| format!("`{n}`")).collect();
        let _ = writeln!(out, "{}", listed.join(", "));
    }
    out
}

#[must_use]
pub fn render_endpoints(endpoints: &[EndpointSummary]) -> String {
    if endpoints.is_empty() {
        return "No endpoints registered. Use `register_endpoint` to add one.\n".to_string();
    }

    let mut out = format!("## Endpoints ({})\n\n", endpoints.len());
    out.push_str("| Name | URL | Headers | Mutations | Tool prefix | Requests | Errors |\n");
    out.push_str("|------|-----|---------|-----------|-------------|----------|--------|\n");
    for endpoint in endpoints {
        let headers = if endpoint.header_names.is_empty() {
            "-".to_string()
        } else {
            endpoint.header_names.join(", ")
        };
        let _ = writeln!(
            out,
            "| `{}` | {} | {headers} | {} | {} | {} | {} |",
            endpoint.name,
            endpoint.url,
            yes_no(endpoint.allow_mutations),
            endpoint.tool_prefix.as_deref().unwrap_or("-"),
            endpoint.access_count,
            endpoint.error_count
        );
    }
    out
}
