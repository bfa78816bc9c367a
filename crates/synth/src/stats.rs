//! Schema statistics and root operation listing.

use crate::schema::{OperationKind, SchemaGraph, TypeKind};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Similarity above which two schemas are reported as compatible.
const COMPATIBILITY_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplexityRating {
    Simple,
    Moderate,
    Complex,
    #[serde(rename = "Very Complex")]
    VeryComplex,
}

impl ComplexityRating {
    #[must_use]
    pub const fn from_score(score: usize) -> Self {
        match score {
            0..20 => Self::Simple,
            20..50 => Self::Moderate,
            50..80 => Self::Complex,
            _ => Self::VeryComplex,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }
}

impl fmt::Display for ComplexityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size summary of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStats {
    pub types: usize,
    /// Fields over object, interface and input object types.
    pub fields: usize,
    /// Query plus mutation root fields.
    pub operations: usize,
    /// `min(100, types*2 + fields/10 + operations*3)`
    pub complexity_score: usize,
    pub rating: ComplexityRating,
}

impl SchemaStats {
    #[must_use]
    pub fn from_graph(schema: &SchemaGraph) -> Self {
        let types = schema.len();
        let fields = schema
            .types()
            .filter(|t| {
                matches!(
                    t.kind,
                    TypeKind::Object | TypeKind::Interface | TypeKind::InputObject
                )
            })
            .map(|t| t.fields.len())
            .sum::<usize>();
        let operations = [OperationKind::Query, OperationKind::Mutation]
            .into_iter()
            .filter_map(|kind| schema.root_type(kind))
            .map(|t| t.fields.len())
            .sum::<usize>();

        let complexity_score = (types * 2 + fields / 10 + operations * 3).min(100);
        Self {
            types,
            fields,
            operations,
            complexity_score,
            rating: ComplexityRating::from_score(complexity_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentSummary {
    pub name: String,
    pub type_syntax: String,
    pub required: bool,
}

/// One callable root field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub kind: OperationKind,
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<ArgumentSummary>,
    pub return_type: String,
    pub is_deprecated: bool,
}

impl OperationSummary {
    /// `name(a: T!, b: U): Return`
    #[must_use]
    pub fn signature(&self) -> String {
        if self.arguments.is_empty() {
            return format!("{}: {}", self.name, self.return_type);
        }
        let args: Vec<_> = self
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.name, a.type_syntax))
            .collect();
        format!("{}({}): {}", self.name, args.join(", "), self.return_type)
    }
}

/// Query fields, then mutation fields when requested, in declaration order.
#[must_use]
pub fn list_operations(schema: &SchemaGraph, include_mutations: bool) -> Vec<OperationSummary> {
    let kinds: &[OperationKind] = if include_mutations {
        &[OperationKind::Query, OperationKind::Mutation]
    } else {
        &[OperationKind::Query]
    };

    kinds
        .iter()
        .filter_map(|&kind| schema.root_type(kind).map(|root| (kind, root)))
        .flat_map(|(kind, root)| {
            root.fields.iter().map(move |field| OperationSummary {
                kind,
                name: field.name.clone(),
                description: field.description.clone(),
                arguments: field
                    .arguments
                    .iter()
                    .map(|arg| ArgumentSummary {
                        name: arg.name.clone(),
                        type_syntax: arg.type_ref.to_type_string(),
                        required: arg.is_required(),
                    })
                    .collect(),
                return_type: field.type_ref.to_type_string(),
                is_deprecated: field.is_deprecated,
            })
        })
        .collect()
}

/// Type-level overlap between two schemas, compared by type name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaComparison {
    pub total_types_a: usize,
    pub total_types_b: usize,
    pub common_types: usize,
    /// Type names present only in the first schema, sorted.
    pub only_in_a: Vec<String>,
    /// Type names present only in the second schema, sorted.
    pub only_in_b: Vec<String>,
    /// `common / max(total_a, total_b) * 100`, rounded to two decimals.
    pub similarity_score: f64,
    pub are_compatible: bool,
}

impl SchemaComparison {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_graphs(a: &SchemaGraph, b: &SchemaGraph) -> Self {
        let names_a: BTreeSet<&str> = a.types().map(|t| t.name.as_str()).collect();
        let names_b: BTreeSet<&str> = b.types().map(|t| t.name.as_str()).collect();

        let common_types = names_a.intersection(&names_b).count();
        let largest = names_a.len().max(names_b.len());
        // Two empty schemas are identical.
        let similarity_score = if largest == 0 {
            100.0
        } else {
            (common_types as f64 / largest as f64 * 10_000.0).round() / 100.0
        };

        Self {
            total_types_a: names_a.len(),
            total_types_b: names_b.len(),
            common_types,
            only_in_a: names_a.difference(&names_b).map(|n| (*n).to_string()).collect(),
            only_in_b: names_b.difference(&names_a).map(|n| (*n).to_string()).collect(),
            similarity_score,
            are_compatible: similarity_score > COMPATIBILITY_THRESHOLD,
        }
    }
}
