//! Type reference resolution: unwrapping `NON_NULL`/`LIST` wrappers around a
//! named type and printing them back as GraphQL type syntax.

use crate::{Result, SynthError};
use graphql_introspect::{IntrospectionTypeRefFull, TypeKind};
use std::fmt;

/// Wrapper chains longer than this are treated as corrupt. Our own
/// introspection query asks for 7 levels of `ofType`, but payloads produced by
/// other tools may ask for more.
const MAX_WRAPPER_DEPTH: usize = 32;

/// A wrapper chain terminating in exactly one named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

/// The canonical `(baseName, isList, isNonNull)` view of a [`TypeRef`].
///
/// `is_list` is true if any wrapper in the chain is a list; `is_non_null`
/// describes the outermost position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedType<'a> {
    pub base_name: &'a str,
    pub is_list: bool,
    pub is_non_null: bool,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Converts an introspection type reference into a [`TypeRef`].
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::MalformedTypeRef`] when a wrapper lacks `ofType`,
    /// a named kind lacks `name`, or the chain exceeds the wrapper limit.
    pub fn from_introspection(type_ref: &IntrospectionTypeRefFull) -> Result<Self> {
        let mut wrappers = Vec::new();
        let mut current = type_ref;

        let name = loop {
            if wrappers.len() > MAX_WRAPPER_DEPTH {
                return Err(SynthError::MalformedTypeRef(format!(
                    "wrapper chain deeper than {MAX_WRAPPER_DEPTH}"
                )));
            }
            if current.kind.is_wrapper() {
                wrappers.push(current.kind);
                current = current.of_type.as_deref().ok_or_else(|| {
                    SynthError::MalformedTypeRef(format!("{:?} wrapper without ofType", current.kind))
                })?;
            } else {
                break current.name.clone().ok_or_else(|| {
                    SynthError::MalformedTypeRef(format!("{:?} type without a name", current.kind))
                })?;
            }
        };

        Ok(wrappers
            .into_iter()
            .rev()
            .fold(Self::Named(name), |inner, kind| match kind {
                TypeKind::List => inner.list(),
                _ => inner.non_null(),
            }))
    }

    /// Unwraps the chain into its base name and wrapper flags.
    #[must_use]
    pub fn resolve(&self) -> ResolvedType<'_> {
        let is_non_null = matches!(self, Self::NonNull(_));
        let mut is_list = false;
        let mut current = self;
        loop {
            match current {
                Self::Named(name) => {
                    return ResolvedType {
                        base_name: name,
                        is_list,
                        is_non_null,
                    }
                }
                Self::NonNull(inner) => current = inner,
                Self::List(inner) => {
                    is_list = true;
                    current = inner;
                }
            }
        }
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        self.resolve().base_name
    }

    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// GraphQL syntax for this reference: `Name`, `Name!`, `[Name]`, `[Name!]!`, ...
    #[must_use]
    pub fn to_type_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}
