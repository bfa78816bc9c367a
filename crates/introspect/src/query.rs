//! The introspection query document.

/// Standard GraphQL introspection query.
///
/// Fetches root operation types, every named type with fields, arguments,
/// enum values and possible types, and directive definitions.
///
/// Type references are nested 7 levels deep to cover wrappers like
/// `[[[String!]!]!]`.
pub const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type {
    ...TypeRef
  }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// JSON request body carrying [`INTROSPECTION_QUERY`].
#[must_use]
pub fn introspection_request_body() -> serde_json::Value {
    serde_json::json!({
        "query": INTROSPECTION_QUERY,
        "operationName": "IntrospectionQuery",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspection_query_shape() {
        assert!(INTROSPECTION_QUERY.contains("IntrospectionQuery"));
        assert!(INTROSPECTION_QUERY.contains("__schema"));
        assert!(INTROSPECTION_QUERY.contains("possibleTypes"));
        assert!(INTROSPECTION_QUERY.contains("defaultValue"));
    }

    #[test]
    fn test_request_body_names_operation() {
        let body = introspection_request_body();
        assert_eq!(body["operationName"], "IntrospectionQuery");
        assert_eq!(body["query"], INTROSPECTION_QUERY);
    }
}
