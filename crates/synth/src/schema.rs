//! Immutable, name-addressed view of an introspected schema.
//!
//! A [`SchemaGraph`] is built once per request from an introspection payload
//! and never mutated afterwards. Field, argument and possible-type order is
//! preserved from the payload; all synthesis output order derives from it.

use crate::{Result, SynthError, TypeRef};
use graphql_introspect::{
    IntrospectionField, IntrospectionInputValue, IntrospectionResponse, IntrospectionType,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of named type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

impl TypeKind {
    /// Scalars and enums are selected by name, without a selection set.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum)
    }

    /// Objects, interfaces and unions require a non-empty selection set.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }
}

/// The root operation types a schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }

    pub(crate) const fn default_root_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "mutation" => Ok(Self::Mutation),
            "subscription" => Ok(Self::Subscription),
            other => Err(format!(
                "unknown operation kind '{other}' (expected query, mutation or subscription)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub default_value: Option<String>,
}

impl ArgumentDefinition {
    /// A non-null argument without a default must be given a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.type_ref.is_non_null() && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub arguments: Vec<ArgumentDefinition>,
    pub is_deprecated: bool,
}

impl FieldDefinition {
    #[must_use]
    pub fn has_required_arguments(&self) -> bool {
        self.arguments.iter().any(ArgumentDefinition::is_required)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    /// Output fields for objects and interfaces, input fields for input
    /// objects, empty otherwise.
    pub fields: Vec<FieldDefinition>,
    /// Populated only for interfaces and unions.
    pub possible_types: Vec<String>,
    /// Populated only for enums.
    pub enum_values: Vec<String>,
}

impl TypeDefinition {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Mapping from type name to [`TypeDefinition`], plus the root type names.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    types: BTreeMap<String, TypeDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl SchemaGraph {
    /// Builds the graph from an introspection payload in one pass.
    ///
    /// Meta-types (names starting with `__`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::MalformedTypeRef`] if any field or argument type
    /// reference is malformed.
    #[tracing::instrument(skip(introspection), fields(types = introspection.data.schema.types.len()))]
    pub fn build(introspection: &IntrospectionResponse) -> Result<Self> {
        let schema = &introspection.data.schema;
        let mut types = BTreeMap::new();

        for raw in &schema.types {
            if raw.name().starts_with("__") {
                continue;
            }
            let definition = convert_type(raw)?;
            if let Some(previous) = types.insert(definition.name.clone(), definition) {
                tracing::warn!(name = %previous.name, "Duplicate type in payload, keeping the last");
            }
        }

        let graph = Self {
            types,
            query_type: schema.query_type.as_ref().map(|t| t.name.clone()),
            mutation_type: schema.mutation_type.as_ref().map(|t| t.name.clone()),
            subscription_type: schema.subscription_type.as_ref().map(|t| t.name.clone()),
        };
        tracing::debug!(types = graph.types.len(), "Schema graph built");
        Ok(graph)
    }

    /// Parses raw introspection JSON and builds the graph.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::SchemaUnavailable`] if the payload is missing or
    /// not an introspection response.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let response = IntrospectionResponse::from_json_str(json)?;
        Self::build(&response)
    }

    /// Looks up a type by name.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::TypeNotFound`] if no such type exists.
    pub fn lookup(&self, name: &str) -> Result<&TypeDefinition> {
        self.types
            .get(name)
            .ok_or_else(|| SynthError::TypeNotFound(name.to_string()))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Types in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Name of the root type for `kind`. Falls back to the conventional name
    /// (`Query`, `Mutation`, `Subscription`) when the payload omits it but a
    /// type with that name exists.
    #[must_use]
    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        let declared = match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        };
        declared.or_else(|| {
            let fallback = kind.default_root_name();
            self.types.contains_key(fallback).then_some(fallback)
        })
    }

    /// The root type definition for `kind`, if the schema declares one.
    #[must_use]
    pub fn root_type(&self, kind: OperationKind) -> Option<&TypeDefinition> {
        self.root_type_name(kind).and_then(|name| self.types.get(name))
    }
}

fn convert_type(raw: &IntrospectionType) -> Result<TypeDefinition> {
    let definition = match raw {
        IntrospectionType::Scalar(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::Scalar,
            description: t.description.clone(),
            fields: Vec::new(),
            possible_types: Vec::new(),
            enum_values: Vec::new(),
        },
        IntrospectionType::Object(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::Object,
            description: t.description.clone(),
            fields: convert_fields(&t.fields)?,
            possible_types: Vec::new(),
            enum_values: Vec::new(),
        },
        IntrospectionType::Interface(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::Interface,
            description: t.description.clone(),
            fields: convert_fields(&t.fields)?,
            possible_types: t.possible_types.iter().map(|p| p.name.clone()).collect(),
            enum_values: Vec::new(),
        },
        IntrospectionType::Union(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::Union,
            description: t.description.clone(),
            fields: Vec::new(),
            possible_types: t.possible_types.iter().map(|p| p.name.clone()).collect(),
            enum_values: Vec::new(),
        },
        IntrospectionType::Enum(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::Enum,
            description: t.description.clone(),
            fields: Vec::new(),
            possible_types: Vec::new(),
            enum_values: t.enum_values.iter().map(|v| v.name.clone()).collect(),
        },
        IntrospectionType::InputObject(t) => TypeDefinition {
            name: t.name.clone(),
            kind: TypeKind::InputObject,
            description: t.description.clone(),
            fields: t
                .input_fields
                .iter()
                .map(|input| {
                    Ok(FieldDefinition {
                        name: input.name.clone(),
                        description: input.description.clone(),
                        type_ref: TypeRef::from_introspection(&input.type_ref)?,
                        arguments: Vec::new(),
                        is_deprecated: false,
                    })
                })
                .collect::<Result<_>>()?,
            possible_types: Vec::new(),
            enum_values: Vec::new(),
        },
    };
    Ok(definition)
}

fn convert_fields(fields: &[IntrospectionField]) -> Result<Vec<FieldDefinition>> {
    fields
        .iter()
        .map(|field| {
            Ok(FieldDefinition {
                name: field.name.clone(),
                description: field.description.clone(),
                type_ref: TypeRef::from_introspection(&field.type_ref)?,
                arguments: convert_arguments(&field.args)?,
                is_deprecated: field.is_deprecated,
            })
        })
        .collect()
}

fn convert_arguments(args: &[IntrospectionInputValue]) -> Result<Vec<ArgumentDefinition>> {
    args.iter()
        .map(|arg| {
            Ok(ArgumentDefinition {
                name: arg.name.clone(),
                type_ref: TypeRef::from_introspection(&arg.type_ref)?,
                default_value: arg.default_value.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
      "data": {
        "__schema": {
          "queryType": { "name": "Root" },
          "mutationType": null,
          "types": [
            {
              "kind": "OBJECT",
              "name": "Root",
              "fields": [
                {
                  "name": "node",
                  "args": [
                    { "name": "id", "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "ID", "ofType": null } }, "defaultValue": null },
                    { "name": "first", "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "Int", "ofType": null } }, "defaultValue": "10" }
                  ],
                  "type": { "kind": "INTERFACE", "name": "Node", "ofType": null }
                },
                {
                  "name": "zeta",
                  "args": [],
                  "type": { "kind": "ENUM", "name": "Color", "ofType": null }
                }
              ],
              "interfaces": []
            },
            { "kind": "INTERFACE", "name": "Node", "fields": [], "possibleTypes": [{ "kind": "OBJECT", "name": "B" }, { "kind": "OBJECT", "name": "A" }] },
            { "kind": "ENUM", "name": "Color", "enumValues": [{ "name": "RED" }, { "name": "GREEN" }] },
            { "kind": "SCALAR", "name": "ID" },
            { "kind": "SCALAR", "name": "Int" },
            { "kind": "OBJECT", "name": "__Schema", "fields": [] }
          ]
        }
      }
    }"#;

    #[test]
    fn test_build_skips_meta_types() {
        let graph = SchemaGraph::from_json_str(PAYLOAD).unwrap();
        assert!(graph.get("__Schema").is_none());
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let graph = SchemaGraph::from_json_str(PAYLOAD).unwrap();
        let root = graph.lookup("Root").unwrap();
        let names: Vec<_> = root.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["node", "zeta"]);

        let node = graph.lookup("Node").unwrap();
        assert_eq!(node.kind, TypeKind::Interface);
        assert_eq!(node.possible_types, vec!["B", "A"]);

        let color = graph.lookup("Color").unwrap();
        assert_eq!(color.enum_values, vec!["RED", "GREEN"]);
    }

    #[test]
    fn test_required_arguments() {
        let graph = SchemaGraph::from_json_str(PAYLOAD).unwrap();
        let node = graph.lookup("Root").unwrap().field("node").unwrap();
        assert!(node.arguments[0].is_required());
        // Non-null with a default may be omitted
        assert!(!node.arguments[1].is_required());
        assert!(node.has_required_arguments());
    }

    #[test]
    fn test_root_type_names() {
        let graph = SchemaGraph::from_json_str(PAYLOAD).unwrap();
        assert_eq!(graph.root_type_name(OperationKind::Query), Some("Root"));
        assert_eq!(graph.root_type_name(OperationKind::Mutation), None);
        assert!(graph.root_type(OperationKind::Subscription).is_none());
    }

    #[test]
    fn test_lookup_missing_type() {
        let graph = SchemaGraph::from_json_str(PAYLOAD).unwrap();
        assert_eq!(
            graph.lookup("Nope").unwrap_err(),
            SynthError::TypeNotFound("Nope".to_string())
        );
    }

    #[test]
    fn test_invalid_payload_is_schema_unavailable() {
        let err = SchemaGraph::from_json_str(r#"{"data": null}"#).unwrap_err();
        assert_eq!(err.kind(), "SchemaUnavailable");
    }

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!("Query".parse::<OperationKind>(), Ok(OperationKind::Query));
        assert_eq!("mutation".parse::<OperationKind>(), Ok(OperationKind::Mutation));
        assert!("fetch".parse::<OperationKind>().is_err());
        assert_eq!(OperationKind::Subscription.to_string(), "subscription");
    }
}
