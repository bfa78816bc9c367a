//! End-to-end synthesis behaviour over small hand-built schemas.

use graphql_synth::{
    OperationAssembler, OperationKind, SchemaGraph, SelectionNode, SynthError, SynthesisOptions,
    Synthesizer, MAX_DEPTH_LIMIT,
};
use serde_json::{json, Value};

// Introspection JSON builders

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

fn scalar_ref(name: &str) -> Value {
    named("SCALAR", name)
}

fn object_ref(name: &str) -> Value {
    named("OBJECT", name)
}

fn field(name: &str, ty: Value) -> Value {
    json!({ "name": name, "args": [], "type": ty })
}

fn field_with_args(name: &str, args: &[(&str, Value)], ty: Value) -> Value {
    let args: Vec<Value> = args
        .iter()
        .map(|(arg, ty)| json!({ "name": arg, "type": ty, "defaultValue": null }))
        .collect();
    json!({ "name": name, "args": args, "type": ty })
}

fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({ "kind": "OBJECT", "name": name, "fields": fields, "interfaces": [] })
}

fn interface(name: &str, fields: Vec<Value>, possible: &[&str]) -> Value {
    let possible: Vec<Value> = possible.iter().map(|p| object_ref(p)).collect();
    json!({ "kind": "INTERFACE", "name": name, "fields": fields, "possibleTypes": possible })
}

fn union(name: &str, members: &[&str]) -> Value {
    let members: Vec<Value> = members.iter().map(|m| object_ref(m)).collect();
    json!({ "kind": "UNION", "name": name, "possibleTypes": members })
}

fn enumeration(name: &str, values: &[&str]) -> Value {
    let values: Vec<Value> = values.iter().map(|v| json!({ "name": v })).collect();
    json!({ "kind": "ENUM", "name": name, "enumValues": values })
}

fn scalar(name: &str) -> Value {
    json!({ "kind": "SCALAR", "name": name })
}

fn build(mut types: Vec<Value>) -> SchemaGraph {
    for builtin in ["ID", "String", "Int", "Boolean"] {
        types.push(scalar(builtin));
    }
    let payload = json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "types": types
            }
        }
    });
    SchemaGraph::from_json_str(&payload.to_string()).unwrap()
}

/// `Query.user(id: ID!): User`, `User { id name posts }`, `Post { id title author }`
fn blog_schema() -> SchemaGraph {
    build(vec![
        object(
            "Query",
            vec![
                field_with_args(
                    "user",
                    &[("id", non_null(scalar_ref("ID")))],
                    object_ref("User"),
                ),
                field_with_args(
                    "search",
                    &[("term", non_null(scalar_ref("String")))],
                    list(named("UNION", "SearchResult")),
                ),
            ],
        ),
        object(
            "User",
            vec![
                field("id", non_null(scalar_ref("ID"))),
                field("name", scalar_ref("String")),
                field("posts", list(object_ref("Post"))),
            ],
        ),
        object(
            "Post",
            vec![
                field("id", non_null(scalar_ref("ID"))),
                field("title", scalar_ref("String")),
                field("author", object_ref("User")),
            ],
        ),
        union("SearchResult", &["User", "Post"]),
    ])
}

fn options(max_depth: usize, include_all_scalars: bool) -> SynthesisOptions {
    SynthesisOptions {
        max_depth,
        include_all_scalars,
    }
}

fn compact(node: SelectionNode) -> String {
    node.into_selection_set()
        .map(|set| set.to_compact_string())
        .unwrap_or_default()
}

fn assemble(schema: &SchemaGraph, field: &str, opts: SynthesisOptions) -> Result<String, SynthError> {
    OperationAssembler::new(schema, opts)?
        .assemble(OperationKind::Query, None, field, &serde_json::Map::new())
        .map(|op| op.compact_text)
}

#[test]
fn test_object_field_expanded_within_depth() {
    let schema = blog_schema();
    assert_eq!(
        assemble(&schema, "user", options(2, true)).unwrap(),
        "query user($id: ID!) { user(id: $id) { id name posts { id title } } }"
    );
}

#[test]
fn test_object_field_omitted_at_depth_one() {
    let schema = blog_schema();
    assert_eq!(
        assemble(&schema, "user", options(1, true)).unwrap(),
        "query user($id: ID!) { user(id: $id) { id name } }"
    );
}

#[test]
fn test_union_fans_out_to_inline_fragments() {
    let schema = blog_schema();
    let text = assemble(&schema, "search", options(2, true)).unwrap();
    assert_eq!(
        text,
        "query search($term: String!) { search(term: $term) { \
         ... on User { id name posts { id title } } \
         ... on Post { id title author { id name } } } }"
    );
}

#[test]
fn test_enum_root_without_scalars_is_empty_selection() {
    let schema = build(vec![
        object("Query", vec![field("status", named("ENUM", "Status"))]),
        enumeration("Status", &["ACTIVE", "INACTIVE"]),
    ]);

    let synthesizer = Synthesizer::new(&schema, options(3, false));
    assert!(synthesizer.synthesize("Status").unwrap().is_empty());

    let err = assemble(&schema, "status", options(3, false)).unwrap_err();
    assert_eq!(err.kind(), "EmptySelectionError");
    assert!(matches!(err, SynthError::EmptySelection(field) if field == "status"));
}

#[test]
fn test_self_reference_expands_once() {
    let schema = build(vec![
        object("Query", vec![field("me", object_ref("User"))]),
        object(
            "User",
            vec![
                field("id", non_null(scalar_ref("ID"))),
                field("friend", object_ref("User")),
            ],
        ),
    ]);
    let node = Synthesizer::new(&schema, options(5, true))
        .synthesize("User")
        .unwrap();
    assert_eq!(compact(node), "{ id friend { id } }");
}

#[test]
fn test_cyclic_schemas_terminate_and_respect_depth() {
    let schema = build(vec![
        object("Query", vec![field("a", object_ref("A"))]),
        object(
            "A",
            vec![
                field("b", object_ref("B")),
                field("self", object_ref("A")),
                field("name", scalar_ref("String")),
            ],
        ),
        object(
            "B",
            vec![
                field("a", object_ref("A")),
                field("many", list(non_null(object_ref("B")))),
                field("name", scalar_ref("String")),
            ],
        ),
    ]);

    for depth in 0..=MAX_DEPTH_LIMIT {
        let node = Synthesizer::new(&schema, options(depth, true))
            .synthesize("A")
            .unwrap();
        match node {
            SelectionNode::Empty => assert_eq!(depth, 0),
            SelectionNode::Selected(set) => {
                assert!(set.depth() <= depth, "depth {} > {depth}", set.depth());
                let text = set.to_compact_string();
                assert!(!text.contains("{ }"), "empty body in {text}");
            }
        }
    }
}

#[test]
fn test_long_chain_is_cut_at_max_depth() {
    let mut types = vec![object("Query", vec![field("start", object_ref("T0"))])];
    for i in 0..20 {
        types.push(object(
            &format!("T{i}"),
            vec![
                field("id", scalar_ref("ID")),
                field("next", object_ref(&format!("T{}", i + 1))),
            ],
        ));
    }
    types.push(object("T20", vec![field("id", scalar_ref("ID"))]));
    let schema = build(types);

    for depth in [1, 3, 7, MAX_DEPTH_LIMIT] {
        let set = Synthesizer::new(&schema, options(depth, true))
            .synthesize("T0")
            .unwrap()
            .into_selection_set()
            .unwrap();
        assert_eq!(set.depth(), depth);
    }
}

#[test]
fn test_depth_above_limit_is_rejected() {
    let schema = blog_schema();
    let err = assemble(&schema, "user", options(MAX_DEPTH_LIMIT + 1, true)).unwrap_err();
    assert_eq!(
        err,
        SynthError::DepthOutOfRange {
            requested: 16,
            limit: 15
        }
    );
}

#[test]
fn test_objects_without_selectable_fields_are_omitted() {
    // `Hollow` has only object fields, which depth forbids expanding.
    let schema = build(vec![
        object("Query", vec![field("root", object_ref("Root"))]),
        object(
            "Root",
            vec![
                field("id", scalar_ref("ID")),
                field("hollow", object_ref("Hollow")),
            ],
        ),
        object("Hollow", vec![field("inner", object_ref("Root"))]),
    ]);
    let node = Synthesizer::new(&schema, options(2, true))
        .synthesize("Root")
        .unwrap();
    assert_eq!(compact(node), "{ id }");

    // Without scalars nothing at all is selectable.
    let node = Synthesizer::new(&schema, options(5, false))
        .synthesize("Root")
        .unwrap();
    assert!(node.is_empty());
}

#[test]
fn test_output_is_deterministic() {
    let schema = blog_schema();
    let first = assemble(&schema, "search", options(4, true)).unwrap();
    for _ in 0..10 {
        assert_eq!(assemble(&schema, "search", options(4, true)).unwrap(), first);
    }
}

#[test]
fn test_nested_fields_with_required_arguments_are_skipped() {
    let schema = build(vec![
        object("Query", vec![field("viewer", object_ref("User"))]),
        object(
            "User",
            vec![
                field("id", scalar_ref("ID")),
                field_with_args("avatar", &[("size", non_null(scalar_ref("Int")))], scalar_ref("String")),
                field_with_args("bio", &[("format", scalar_ref("String"))], scalar_ref("String")),
            ],
        ),
    ]);
    let node = Synthesizer::new(&schema, options(3, true))
        .synthesize("User")
        .unwrap();
    assert_eq!(compact(node), "{ id bio }");
}

#[test]
fn test_interface_fragments_and_fallback() {
    let schema = build(vec![
        object(
            "Query",
            vec![
                field("node", named("INTERFACE", "Node")),
                field("entity", named("INTERFACE", "Entity")),
            ],
        ),
        interface("Node", vec![field("id", scalar_ref("ID"))], &["Post", "User"]),
        interface("Entity", vec![field("id", scalar_ref("ID"))], &[]),
        object("User", vec![field("id", scalar_ref("ID")), field("name", scalar_ref("String"))]),
        object("Post", vec![field("id", scalar_ref("ID")), field("title", scalar_ref("String"))]),
    ]);
    let synthesizer = Synthesizer::new(&schema, options(2, true));

    assert_eq!(
        compact(synthesizer.synthesize("Node").unwrap()),
        "{ ... on Post { id title } ... on User { id name } }"
    );
    assert_eq!(compact(synthesizer.synthesize("Entity").unwrap()), "{ id }");
}

#[test]
fn test_meta_fields_are_skipped() {
    let schema = build(vec![
        object("Query", vec![field("me", object_ref("User"))]),
        object(
            "User",
            vec![
                field("__typename", non_null(scalar_ref("String"))),
                field("id", scalar_ref("ID")),
            ],
        ),
    ]);
    let node = Synthesizer::new(&schema, options(1, true))
        .synthesize("User")
        .unwrap();
    assert_eq!(compact(node), "{ id }");
}

#[test]
fn test_fields_of_missing_types_are_skipped() {
    let schema = build(vec![
        object("Query", vec![field("me", object_ref("User"))]),
        object(
            "User",
            vec![
                field("id", scalar_ref("ID")),
                field("org", object_ref("Organization")),
                field("tags", list(scalar_ref("Tag"))),
            ],
        ),
        union("Owner", &["User", "Team"]),
    ]);

    for depth in 1..=3 {
        assert_eq!(
            assemble(&schema, "me", options(depth, true)).unwrap(),
            "query me { me { id } }"
        );
    }

    let node = Synthesizer::new(&schema, options(2, true))
        .synthesize("Owner")
        .unwrap();
    assert_eq!(compact(node), "{ ... on User { id } }");

    let err = Synthesizer::new(&schema, options(2, true))
        .synthesize("Organization")
        .unwrap_err();
    assert_eq!(err, SynthError::TypeNotFound("Organization".to_string()));
}
