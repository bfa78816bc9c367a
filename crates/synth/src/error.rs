use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

/// Terminal failures of schema ingestion, synthesis and assembly.
///
/// None of these are retried; a failed request never yields a partial
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("Schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("Type '{0}' not found in schema")]
    TypeNotFound(String),

    #[error("Field '{field}' not found on root type '{root_type}'{}", did_you_mean(.suggestion.as_deref()))]
    OperationFieldNotFound {
        root_type: String,
        field: String,
        suggestion: Option<String>,
    },

    #[error("No selectable fields for '{0}' within the requested depth")]
    EmptySelection(String),

    #[error("Malformed type reference: {0}")]
    MalformedTypeRef(String),

    #[error("Max depth {requested} exceeds the limit of {limit}")]
    DepthOutOfRange { requested: usize, limit: usize },
}

impl SynthError {
    /// Stable identifier of the error kind, suitable for structured output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SchemaUnavailable(_) => "SchemaUnavailable",
            Self::TypeNotFound(_) => "TypeNotFound",
            Self::OperationFieldNotFound { .. } => "OperationFieldNotFound",
            Self::EmptySelection(_) => "EmptySelectionError",
            Self::MalformedTypeRef(_) => "MalformedTypeRef",
            Self::DepthOutOfRange { .. } => "DepthOutOfRange",
        }
    }
}

impl From<graphql_introspect::IntrospectionError> for SynthError {
    fn from(error: graphql_introspect::IntrospectionError) -> Self {
        Self::SchemaUnavailable(error.to_string())
    }
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_message_with_suggestion() {
        let err = SynthError::OperationFieldNotFound {
            root_type: "Query".to_string(),
            field: "usr".to_string(),
            suggestion: Some("user".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Field 'usr' not found on root type 'Query' (did you mean 'user'?)"
        );
        assert_eq!(err.kind(), "OperationFieldNotFound");
    }

    #[test]
    fn test_field_not_found_message_without_suggestion() {
        let err = SynthError::OperationFieldNotFound {
            root_type: "Mutation".to_string(),
            field: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Field 'zzz' not found on root type 'Mutation'");
    }

    #[test]
    fn test_introspection_errors_become_schema_unavailable() {
        let err: SynthError =
            graphql_introspect::IntrospectionError::Http(500, "boom".to_string()).into();
        assert_eq!(err.kind(), "SchemaUnavailable");
        assert!(err.to_string().contains("boom"));
    }
}
