//! Schema-driven GraphQL operation synthesis.
//!
//! Given an introspected schema and a root operation field, this crate
//! builds a depth-bounded, cycle-safe selection set and assembles it into an
//! executable operation with its variable declarations.
//!
//! The pipeline runs leaf-first:
//!
//! 1. [`TypeRef`] unwraps `NON_NULL`/`LIST` wrappers and prints type syntax.
//! 2. [`SchemaGraph`] indexes the introspection payload by type name.
//! 3. [`Synthesizer`] walks the graph and produces a [`SelectionNode`].
//! 4. [`OperationAssembler`] turns a root field plus selection into an
//!    [`AssembledOperation`].
//!
//! Everything here is pure and synchronous; fetching the payload is the job
//! of `graphql-introspect`.
//!
//! # Example
//!
//! ```
//! use graphql_synth::{OperationAssembler, OperationKind, SchemaGraph, SynthesisOptions};
//!
//! # fn main() -> Result<(), graphql_synth::SynthError> {
//! let payload = r#"{"data":{"__schema":{"queryType":{"name":"Query"},"types":[
//!   {"kind":"OBJECT","name":"Query","fields":[
//!     {"name":"me","args":[],"type":{"kind":"OBJECT","name":"User"}}]},
//!   {"kind":"OBJECT","name":"User","fields":[
//!     {"name":"id","args":[],"type":{"kind":"SCALAR","name":"ID"}}]},
//!   {"kind":"SCALAR","name":"ID"}]}}}"#;
//!
//! let schema = SchemaGraph::from_json_str(payload)?;
//! let assembler = OperationAssembler::new(&schema, SynthesisOptions::default())?;
//! let operation = assembler.assemble(OperationKind::Query, None, "me", &serde_json::Map::new())?;
//! assert_eq!(operation.compact_text, "query me { me { id } }");
//! # Ok(())
//! # }
//! ```

mod error;
mod operation;
mod schema;
mod selection;
mod stats;
mod type_ref;

pub use error::{Result, SynthError};
pub use operation::{AssembledOperation, OperationAssembler, VariableDeclaration};
pub use schema::{
    ArgumentDefinition, FieldDefinition, OperationKind, SchemaGraph, TypeDefinition, TypeKind,
};
pub use selection::{
    Selection, SelectionNode, SelectionSet, SynthesisOptions, Synthesizer, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_LIMIT,
};
pub use stats::{
    list_operations, ArgumentSummary, ComplexityRating, OperationSummary, SchemaComparison,
    SchemaStats,
};
pub use type_ref::{ResolvedType, TypeRef};
