//! Operation assembly: root field lookup, argument-to-variable promotion and
//! rendering of the final operation text.

use crate::schema::{FieldDefinition, OperationKind, SchemaGraph, TypeDefinition};
use crate::selection::{
    SelectionNode, SelectionSet, SynthesisOptions, Synthesizer, MAX_DEPTH_LIMIT,
};
use crate::{Result, SynthError};
use serde::Serialize;

/// Suggestions below this similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// One `$variable` declared by an assembled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    /// Argument name, without the `$`.
    pub name: String,
    pub type_syntax: String,
    /// The argument's default in GraphQL syntax, repeated on the variable so
    /// a non-null argument stays optional for the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub required: bool,
    /// Whether the caller supplied a value for this variable.
    pub supplied: bool,
}

/// A complete, executable operation plus the metadata reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledOperation {
    pub kind: OperationKind,
    pub operation_name: String,
    pub root_field: String,
    /// Pretty-printed with two spaces per nesting level.
    pub query_text: String,
    /// The same operation on a single line.
    pub compact_text: String,
    pub variables: Vec<VariableDeclaration>,
    pub max_depth: usize,
    pub include_all_scalars: bool,
    /// Required variables with no supplied value.
    pub missing_required: Vec<String>,
    /// Supplied values matching no argument of the root field.
    pub unknown_supplied: Vec<String>,
}

impl AssembledOperation {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.missing_required.is_empty() || !self.unknown_supplied.is_empty()
    }
}

/// Combines a root field's signature with a synthesized selection.
///
/// ```
/// use graphql_synth::{OperationAssembler, OperationKind, SchemaGraph, SynthesisOptions};
///
/// # fn main() -> Result<(), graphql_synth::SynthError> {
/// # let payload = r#"{"data":{"__schema":{"queryType":{"name":"Query"},"types":[
/// #   {"kind":"OBJECT","name":"Query","fields":[{"name":"hello","args":[],"type":{"kind":"SCALAR","name":"String"}}]},
/// #   {"kind":"SCALAR","name":"String"}]}}}"#;
/// let schema = SchemaGraph::from_json_str(payload)?;
/// let assembler = OperationAssembler::new(&schema, SynthesisOptions::default())?;
/// let operation = assembler.assemble(OperationKind::Query, None, "hello", &serde_json::Map::new())?;
/// assert_eq!(operation.compact_text, "query hello { hello }");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OperationAssembler<'s> {
    schema: &'s SchemaGraph,
    synthesizer: Synthesizer<'s>,
}

impl<'s> OperationAssembler<'s> {
    /// # Errors
    ///
    /// Returns [`SynthError::DepthOutOfRange`] if `options.max_depth` exceeds
    /// [`MAX_DEPTH_LIMIT`].
    pub fn new(schema: &'s SchemaGraph, options: SynthesisOptions) -> Result<Self> {
        if options.max_depth > MAX_DEPTH_LIMIT {
            return Err(SynthError::DepthOutOfRange {
                requested: options.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        Ok(Self {
            schema,
            synthesizer: Synthesizer::new(schema, options),
        })
    }

    /// Assembles `<kind> <name>(<vars>) { <root_field>(<args>) <selection> }`.
    ///
    /// Every argument of the root field is declared as a variable, whether or
    /// not `supplied` carries a value for it. `operation_name` defaults to the
    /// root field name and is coerced into a valid GraphQL name.
    ///
    /// # Errors
    ///
    /// - [`SynthError::TypeNotFound`] if the schema has no root type for
    ///   `kind`, or the field's return type is missing.
    /// - [`SynthError::OperationFieldNotFound`] if the root type lacks
    ///   `root_field`.
    /// - [`SynthError::EmptySelection`] if nothing is selectable below the
    ///   root field.
    #[tracing::instrument(skip(self, supplied), fields(kind = %kind))]
    pub fn assemble(
        &self,
        kind: OperationKind,
        operation_name: Option<&str>,
        root_field: &str,
        supplied: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<AssembledOperation> {
        let root_type = self
            .schema
            .root_type(kind)
            .ok_or_else(|| SynthError::TypeNotFound(kind.default_root_name().to_string()))?;
        let field = find_root_field(root_type, root_field)?;

        let selection = self.root_selection(field)?;
        let variables = declare_variables(field, supplied);
        let operation_name = sanitize_name(operation_name.unwrap_or(root_field), root_field);

        let missing_required = variables
            .iter()
            .filter(|v| v.required && !v.supplied)
            .map(|v| v.name.clone())
            .collect();
        let unknown_supplied = supplied
            .keys()
            .filter(|key| !field.arguments.iter().any(|arg| &arg.name == *key))
            .cloned()
            .collect();

        let parts = RenderParts {
            kind,
            operation_name: &operation_name,
            field,
            variables: &variables,
            selection: selection.as_ref(),
        };
        let options = self.synthesizer.options();
        let operation = AssembledOperation {
            kind,
            operation_name: operation_name.clone(),
            root_field: field.name.clone(),
            query_text: parts.render_pretty(),
            compact_text: parts.render_compact(),
            variables,
            max_depth: options.max_depth,
            include_all_scalars: options.include_all_scalars,
            missing_required,
            unknown_supplied,
        };

        tracing::info!(
            operation = %operation.operation_name,
            variables = operation.variables.len(),
            "Operation assembled"
        );
        Ok(operation)
    }

    /// `None` for a leaf root field selected by name alone.
    fn root_selection(&self, field: &FieldDefinition) -> Result<Option<SelectionSet>> {
        let return_type = self.schema.lookup(field.type_ref.base_name())?;
        if return_type.kind.is_leaf() && self.synthesizer.options().include_all_scalars {
            return Ok(None);
        }
        match self.synthesizer.synthesize(&return_type.name)? {
            SelectionNode::Selected(set) => Ok(Some(set)),
            SelectionNode::Empty => Err(SynthError::EmptySelection(field.name.clone())),
        }
    }
}

fn find_root_field<'a>(root_type: &'a TypeDefinition, name: &str) -> Result<&'a FieldDefinition> {
    root_type.field(name).ok_or_else(|| SynthError::OperationFieldNotFound {
        root_type: root_type.name.clone(),
        field: name.to_string(),
        suggestion: closest_field(root_type, name),
    })
}

/// The most similar field name, if any is close enough.
fn closest_field(root_type: &TypeDefinition, name: &str) -> Option<String> {
    root_type
        .fields
        .iter()
        .map(|f| (strsim::normalized_levenshtein(name, &f.name), &f.name))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, field)| field.clone())
}

fn declare_variables(
    field: &FieldDefinition,
    supplied: &serde_json::Map<String, serde_json::Value>,
) -> Vec<VariableDeclaration> {
    field
        .arguments
        .iter()
        .map(|arg| VariableDeclaration {
            name: arg.name.clone(),
            type_syntax: arg.type_ref.to_type_string(),
            default_value: arg.default_value.clone(),
            required: arg.is_required(),
            supplied: supplied.contains_key(&arg.name),
        })
        .collect()
}

/// Coerces `raw` into `[_A-Za-z][_0-9A-Za-z]*`, falling back to `fallback`
/// when nothing usable remains.
fn sanitize_name(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    let source = if trimmed.is_empty() { fallback } else { trimmed };
    let mut name: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

struct RenderParts<'a> {
    kind: OperationKind,
    operation_name: &'a str,
    field: &'a FieldDefinition,
    variables: &'a [VariableDeclaration],
    selection: Option<&'a SelectionSet>,
}

impl RenderParts<'_> {
    /// `query name($a: T, $b: U = 1)` without the opening brace.
    fn header(&self) -> String {
        let mut out = format!("{} {}", self.kind, self.operation_name);
        if !self.variables.is_empty() {
            let declared: Vec<_> = self
                .variables
                .iter()
                .map(|v| match &v.default_value {
                    Some(default) => format!("${}: {} = {default}", v.name, v.type_syntax),
                    None => format!("${}: {}", v.name, v.type_syntax),
                })
                .collect();
            out.push('(');
            out.push_str(&declared.join(", "));
            out.push(')');
        }
        out
    }

    /// `field(a: $a, b: $b)`
    fn field_call(&self) -> String {
        let mut out = self.field.name.clone();
        if !self.variables.is_empty() {
            let mapped: Vec<_> = self
                .variables
                .iter()
                .map(|v| format!("{}: ${}", v.name, v.name))
                .collect();
            out.push('(');
            out.push_str(&mapped.join(", "));
            out.push(')');
        }
        out
    }

    fn render_compact(&self) -> String {
        let mut out = self.header();
        out.push_str(" { ");
        out.push_str(&self.field_call());
        if let Some(selection) = self.selection {
            out.push(' ');
            selection.write_compact(&mut out);
        }
        out.push_str(" }");
        out
    }

    fn render_pretty(&self) -> String {
        let mut out = self.header();
        out.push_str(" {\n  ");
        out.push_str(&self.field_call());
        if let Some(selection) = self.selection {
            out.push(' ');
            selection.write_pretty(&mut out, 1);
        }
        out.push_str("\n}");
        out
    }
}
