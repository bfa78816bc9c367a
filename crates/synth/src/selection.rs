//! Depth-bounded, cycle-safe selection set synthesis.
//!
//! Starting from a composite type, [`Synthesizer`] walks the schema graph in
//! declaration order and builds the largest selection that satisfies three
//! constraints:
//!
//! - field nesting never exceeds `max_depth` (the root field's own selection
//!   set is depth 1; inline fragments do not add a level),
//! - no root-to-leaf path enters the same composite type twice,
//! - a composite field is only emitted with a non-empty body.
//!
//! The path of visited types is a borrowed linked list living on the call
//! stack, so siblings never observe each other's visits.

use crate::schema::{FieldDefinition, SchemaGraph, TypeDefinition, TypeKind};
use crate::Result;

/// Hard ceiling on `max_depth`, bounding call-stack depth and output size.
pub const MAX_DEPTH_LIMIT: usize = 15;

/// Depth used when the caller does not specify one.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Knobs that shape a synthesized selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub max_depth: usize,
    /// When false, scalar and enum fields are left out.
    pub include_all_scalars: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_all_scalars: true,
        }
    }
}

/// One entry of a selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A scalar or enum field.
    Leaf(String),
    /// A composite field with its (non-empty) sub-selection.
    Field { name: String, selection: SelectionSet },
    /// `... on Type { ... }` for one concrete member of an interface or union.
    InlineFragment {
        type_condition: String,
        selection: SelectionSet,
    },
}

/// A selection set that is guaranteed to contain at least one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet(Vec<Selection>);

impl SelectionSet {
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn new(items: Vec<Selection>) -> Option<Self> {
        (!items.is_empty()).then_some(Self(items))
    }

    #[must_use]
    pub fn items(&self) -> &[Selection] {
        &self.0
    }

    /// Number of nested field selection levels, counting this set as 1.
    /// Inline fragments share the level of their enclosing set.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .0
            .iter()
            .map(|item| match item {
                Selection::Leaf(_) => 0,
                Selection::Field { selection, .. } => selection.depth(),
                Selection::InlineFragment { selection, .. } => selection.depth() - 1,
            })
            .max()
            .unwrap_or(0)
    }

    /// Renders `{ a b { c } }` on a single line.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    pub(crate) fn write_compact(&self, out: &mut String) {
        out.push('{');
        for item in &self.0 {
            out.push(' ');
            match item {
                Selection::Leaf(name) => out.push_str(name),
                Selection::Field { name, selection } => {
                    out.push_str(name);
                    out.push(' ');
                    selection.write_compact(out);
                }
                Selection::InlineFragment {
                    type_condition,
                    selection,
                } => {
                    out.push_str("... on ");
                    out.push_str(type_condition);
                    out.push(' ');
                    selection.write_compact(out);
                }
            }
        }
        out.push_str(" }");
    }

    /// Renders the set with one item per line and two spaces per level.
    /// `indent` is the level of the line holding the opening brace.
    pub(crate) fn write_pretty(&self, out: &mut String, indent: usize) {
        out.push_str("{\n");
        let pad = "  ".repeat(indent + 1);
        for item in &self.0 {
            out.push_str(&pad);
            match item {
                Selection::Leaf(name) => out.push_str(name),
                Selection::Field { name, selection } => {
                    out.push_str(name);
                    out.push(' ');
                    selection.write_pretty(out, indent + 1);
                }
                Selection::InlineFragment {
                    type_condition,
                    selection,
                } => {
                    out.push_str("... on ");
                    out.push_str(type_condition);
                    out.push(' ');
                    selection.write_pretty(out, indent + 1);
                }
            }
            out.push('\n');
        }
        out.push_str(&"  ".repeat(indent));
        out.push('}');
    }
}

/// Result of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionNode {
    /// Nothing selectable; the parent field must be omitted.
    Empty,
    Selected(SelectionSet),
}

impl SelectionNode {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn into_selection_set(self) -> Option<SelectionSet> {
        match self {
            Self::Empty => None,
            Self::Selected(set) => Some(set),
        }
    }

    fn from_items(items: Vec<Selection>) -> Self {
        SelectionSet::new(items).map_or(Self::Empty, Self::Selected)
    }
}

/// Composite types entered on the current root-to-leaf path.
#[derive(Clone, Copy)]
struct Path<'a> {
    type_name: &'a str,
    parent: Option<&'a Path<'a>>,
}

impl Path<'_> {
    fn contains(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if node.type_name == name {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

/// Per-call state, copied on recursion.
#[derive(Clone, Copy)]
struct SynthesisContext<'a> {
    remaining_depth: usize,
    path: Option<&'a Path<'a>>,
}

impl SynthesisContext<'_> {
    fn visited(&self, name: &str) -> bool {
        self.path.is_some_and(|path| path.contains(name))
    }
}

/// Builds selection sets over a [`SchemaGraph`].
///
/// Pure and deterministic: identical inputs give identical output.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'s> {
    schema: &'s SchemaGraph,
    options: SynthesisOptions,
}

impl<'s> Synthesizer<'s> {
    #[must_use]
    pub const fn new(schema: &'s SchemaGraph, options: SynthesisOptions) -> Self {
        Self { schema, options }
    }

    #[must_use]
    pub const fn options(&self) -> SynthesisOptions {
        self.options
    }

    /// Synthesizes the selection for a field returning `type_name`.
    ///
    /// Leaf and input types have no selection set and yield
    /// [`SelectionNode::Empty`], as does `max_depth == 0`.
    ///
    /// Besides the depth and cycle bounds, nested fields are omitted when:
    ///
    /// - they take a required argument, since only root arguments become
    ///   variables and nothing could be passed for them;
    /// - their name starts with `__`;
    /// - their type, or a union or interface member, is absent from the
    ///   payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SynthError::TypeNotFound`] if `type_name` itself is
    /// missing from the schema.
    #[tracing::instrument(skip(self), fields(max_depth = self.options.max_depth))]
    pub fn synthesize(&self, type_name: &str) -> Result<SelectionNode> {
        let definition = self.schema.lookup(type_name)?;
        if !definition.kind.is_composite() {
            tracing::debug!(kind = ?definition.kind, "Type has no selection set");
            return Ok(SelectionNode::Empty);
        }
        let Some(remaining_depth) = self.options.max_depth.checked_sub(1) else {
            return Ok(SelectionNode::Empty);
        };

        let context = SynthesisContext {
            remaining_depth,
            path: None,
        };
        self.select_type(definition, context)
    }

    fn select_type(
        &self,
        definition: &TypeDefinition,
        context: SynthesisContext<'_>,
    ) -> Result<SelectionNode> {
        match definition.kind {
            TypeKind::Object => self.select_fields(definition, context),
            TypeKind::Interface if definition.possible_types.is_empty() => {
                self.select_fields(definition, context)
            }
            TypeKind::Interface | TypeKind::Union => self.select_fragments(definition, context),
            // Leaf and input types never reach here: callers check `is_composite`.
            TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => Ok(SelectionNode::Empty),
        }
    }

    /// One inline fragment per concrete member, in `possibleTypes` order.
    /// Fragments do not consume depth.
    fn select_fragments(
        &self,
        definition: &TypeDefinition,
        context: SynthesisContext<'_>,
    ) -> Result<SelectionNode> {
        let mut items = Vec::new();
        for member in &definition.possible_types {
            let Some(concrete) = self.schema.get(member) else {
                tracing::debug!(parent = %definition.name, member = %member, "Skipping member missing from schema");
                continue;
            };
            if concrete.kind != TypeKind::Object {
                continue;
            }
            if let SelectionNode::Selected(selection) = self.select_fields(concrete, context)? {
                items.push(Selection::InlineFragment {
                    type_condition: concrete.name.clone(),
                    selection,
                });
            }
        }
        Ok(SelectionNode::from_items(items))
    }

    fn select_fields(
        &self,
        definition: &TypeDefinition,
        context: SynthesisContext<'_>,
    ) -> Result<SelectionNode> {
        let mut items = Vec::new();
        for field in &definition.fields {
            if let Some(item) = self.select_field(definition, field, context)? {
                items.push(item);
            }
        }
        Ok(SelectionNode::from_items(items))
    }

    fn select_field(
        &self,
        parent: &TypeDefinition,
        field: &FieldDefinition,
        context: SynthesisContext<'_>,
    ) -> Result<Option<Selection>> {
        if field.name.starts_with("__") {
            return Ok(None);
        }
        if field.has_required_arguments() {
            tracing::trace!(parent = %parent.name, field = %field.name, "Skipping field with required arguments");
            return Ok(None);
        }

        let base_name = field.type_ref.base_name();
        let Some(target) = self.schema.get(base_name) else {
            tracing::debug!(parent = %parent.name, field = %field.name, type_name = %base_name, "Skipping field whose type is missing from schema");
            return Ok(None);
        };

        if target.kind.is_leaf() {
            return Ok(self
                .options
                .include_all_scalars
                .then(|| Selection::Leaf(field.name.clone())));
        }
        if !target.kind.is_composite() {
            return Ok(None);
        }

        if context.visited(base_name) {
            tracing::debug!(parent = %parent.name, field = %field.name, "Cycle guard: type already on path");
            return Ok(None);
        }
        let Some(remaining_depth) = context.remaining_depth.checked_sub(1) else {
            tracing::trace!(parent = %parent.name, field = %field.name, "Depth budget exhausted");
            return Ok(None);
        };

        let path = Path {
            type_name: base_name,
            parent: context.path,
        };
        let nested = self.select_type(
            target,
            SynthesisContext {
                remaining_depth,
                path: Some(&path),
            },
        )?;

        Ok(nested.into_selection_set().map(|selection| Selection::Field {
            name: field.name.clone(),
            selection,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Selection {
        Selection::Leaf(name.to_string())
    }

    fn field(name: &str, items: Vec<Selection>) -> Selection {
        Selection::Field {
            name: name.to_string(),
            selection: SelectionSet::new(items).unwrap(),
        }
    }

    #[test]
    fn test_selection_set_rejects_empty() {
        assert!(SelectionSet::new(Vec::new()).is_none());
    }

    #[test]
    fn test_depth_counts_fields_not_fragments() {
        let set = SelectionSet::new(vec![leaf("id")]).unwrap();
        assert_eq!(set.depth(), 1);

        let set = SelectionSet::new(vec![leaf("id"), field("posts", vec![leaf("title")])]).unwrap();
        assert_eq!(set.depth(), 2);

        let set = SelectionSet::new(vec![Selection::InlineFragment {
            type_condition: "User".to_string(),
            selection: SelectionSet::new(vec![field("posts", vec![leaf("id")])]).unwrap(),
        }])
        .unwrap();
        assert_eq!(set.depth(), 2);
    }

    #[test]
    fn test_compact_rendering() {
        let set = SelectionSet::new(vec![
            leaf("id"),
            field("posts", vec![leaf("id"), leaf("title")]),
        ])
        .unwrap();
        assert_eq!(set.to_compact_string(), "{ id posts { id title } }");
    }

    #[test]
    fn test_pretty_rendering() {
        let set = SelectionSet::new(vec![
            leaf("id"),
            Selection::InlineFragment {
                type_condition: "Post".to_string(),
                selection: SelectionSet::new(vec![leaf("title")]).unwrap(),
            },
        ])
        .unwrap();
        let mut out = String::new();
        set.write_pretty(&mut out, 0);
        assert_eq!(out, "{\n  id\n  ... on Post {\n    title\n  }\n}");
    }

    #[test]
    fn test_path_contains_walks_parents() {
        let root = Path {
            type_name: "User",
            parent: None,
        };
        let child = Path {
            type_name: "Post",
            parent: Some(&root),
        };
        assert!(child.contains("User"));
        assert!(child.contains("Post"));
        assert!(!child.contains("Comment"));
        assert!(!root.contains("Post"));
    }
}
