//! MCP tool definitions
//!
//! This module defines the tools exposed to AI agents via MCP. Domain
//! failures come back as tool results flagged `is_error`, never as protocol
//! errors.

use crate::report;
use crate::service::{self, McpService, ToolError};
use crate::types::{
    CompareSchemasParams, GenerateOperationParams, IntrospectSchemaParams, RegisterEndpointParams,
    RemoveEndpointParams,
};
use graphql_synth::{list_operations, SchemaComparison, SchemaStats};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, ErrorData as McpError, ServerHandler};
use std::sync::Arc;
use tokio::sync::Mutex;

/// GraphQL MCP tool router
///
/// This struct implements `ServerHandler` and exposes endpoint management,
/// introspection and operation generation tools.
#[derive(Clone)]
pub struct GraphQLToolRouter {
    service: Arc<Mutex<McpService>>,
    tool_router: ToolRouter<Self>,
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn error_result(error: &ToolError) -> CallToolResult {
    tracing::warn!(kind = error.kind(), error = %error, "Tool failed");
    CallToolResult::error(vec![Content::text(report::render_error(error))])
}

#[rmcp::tool_router]
impl GraphQLToolRouter {
    /// Create a new tool router with the given service
    pub fn new(service: Arc<Mutex<McpService>>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "register_endpoint",
        description = "Register a GraphQL endpoint by name so other tools can introspect it. Re-registering a name replaces the previous endpoint."
    )]
    pub async fn register_endpoint(
        &self,
        params: Parameters<RegisterEndpointParams>,
    ) -> Result<CallToolResult, McpError> {
        let name = params.0.name.trim().to_string();
        let url = params.0.url.clone();
        let mut service = self.service.lock().await;

        Ok(match service.register_endpoint(params.0) {
            Ok(replaced) => {
                let verb = if replaced { "Replaced" } else { "Registered" };
                text_result(format!("{verb} endpoint `{name}` at {url}"))
            }
            Err(e) => error_result(&e),
        })
    }

    #[tool(
        name = "list_endpoints",
        description = "List registered GraphQL endpoints with their URL, header names (values are never shown), mutation permission and request counts."
    )]
    pub async fn list_endpoints(&self) -> Result<CallToolResult, McpError> {
        let service = self.service.lock().await;
        Ok(text_result(report::render_endpoints(&service.list_endpoints())))
    }

    #[tool(
        name = "remove_endpoint",
        description = "Remove a registered GraphQL endpoint by name."
    )]
    pub async fn remove_endpoint(
        &self,
        params: Parameters<RemoveEndpointParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut service = self.service.lock().await;
        Ok(match service.remove_endpoint(&params.0.name) {
            Ok(info) => text_result(format!("Removed endpoint `{}`", info.name)),
            Err(e) => error_result(&e),
        })
    }

    #[tool(
        name = "introspect_schema",
        description = "Fetch the schema of a registered endpoint via introspection and summarize it: type, field and operation counts, a complexity rating and the signature of every root operation."
    )]
    pub async fn introspect_schema(
        &self,
        params: Parameters<IntrospectSchemaParams>,
    ) -> Result<CallToolResult, McpError> {
        let endpoint = match self.service.lock().await.endpoint(&params.0.endpoint) {
            Ok(endpoint) => endpoint,
            Err(e) => return Ok(error_result(&e)),
        };

        let fetched = service::fetch_schema(&endpoint).await;
        self.service
            .lock()
            .await
            .record_access(&endpoint.name, fetched.is_ok());

        Ok(match fetched {
            Ok(schema) => {
                let stats = SchemaStats::from_graph(&schema);
                let operations = list_operations(&schema, params.0.include_mutations);
                let tool_names = endpoint.tool_names(&operations);
                text_result(report::render_schema_overview(
                    &endpoint.name,
                    &stats,
                    &operations,
                    &tool_names,
                ))
            }
            Err(e) => error_result(&ToolError::from(e)),
        })
    }

    #[tool(
        name = "compare_schemas",
        description = "Introspect two registered endpoints and compare their schemas by type name: shared and unique types, a similarity score and whether they are compatible (more than 70% shared)."
    )]
    pub async fn compare_schemas(
        &self,
        params: Parameters<CompareSchemasParams>,
    ) -> Result<CallToolResult, McpError> {
        let endpoints = {
            let service = self.service.lock().await;
            service
                .endpoint(&params.0.endpoint_a)
                .and_then(|a| service.endpoint(&params.0.endpoint_b).map(|b| (a, b)))
        };
        let (endpoint_a, endpoint_b) = match endpoints {
            Ok(endpoints) => endpoints,
            Err(e) => return Ok(error_result(&e)),
        };

        let (fetched_a, fetched_b) = tokio::join!(
            service::fetch_schema(&endpoint_a),
            service::fetch_schema(&endpoint_b)
        );
        {
            let mut service = self.service.lock().await;
            service.record_access(&endpoint_a.name, fetched_a.is_ok());
            service.record_access(&endpoint_b.name, fetched_b.is_ok());
        }

        Ok(match (fetched_a, fetched_b) {
            (Ok(a), Ok(b)) => text_result(report::render_schema_comparison(
                &endpoint_a.name,
                &endpoint_b.name,
                &SchemaComparison::from_graphs(&a, &b),
            )),
            (Err(e), _) | (_, Err(e)) => error_result(&ToolError::from(e)),
        })
    }

    #[tool(
        name = "generate_operation",
        description = "Generate a complete GraphQL operation for a root field of a registered endpoint. Every field argument becomes a variable; the selection set is built from the schema up to max_depth levels, skipping cyclic references. Mutations require an endpoint registered with allow_mutations."
    )]
    pub async fn generate_operation(
        &self,
        params: Parameters<GenerateOperationParams>,
    ) -> Result<CallToolResult, McpError> {
        let (request, endpoint) = {
            let service = self.service.lock().await;
            let prepared = service.prepare_operation(params.0).and_then(|request| {
                let endpoint = service.endpoint(&request.endpoint)?;
                Ok((request, endpoint))
            });
            match prepared {
                Ok(prepared) => prepared,
                Err(e) => return Ok(error_result(&e)),
            }
        };

        let fetched = service::fetch_schema(&endpoint).await;
        self.service
            .lock()
            .await
            .record_access(&endpoint.name, fetched.is_ok());

        let result = fetched
            .map_err(ToolError::from)
            .and_then(|schema| service::generate_operation(&schema, &request));
        Ok(match result {
            Ok(operation) => text_result(report::render_operation(&operation)),
            Err(e) => error_result(&e),
        })
    }
}

#[tool_handler]
impl ServerHandler for GraphQLToolRouter {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "graphql-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GraphQL MCP server that turns introspected schemas into ready-to-run operations. \
                 Use register_endpoint to add an API, introspect_schema to see its operations, \
                 generate_operation to build a query or mutation with its variables, \
                 and compare_schemas to check how closely two APIs overlap."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn router() -> GraphQLToolRouter {
        GraphQLToolRouter::new(Arc::new(Mutex::new(McpService::default())))
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn register(name: &str, url: &str) -> Parameters<RegisterEndpointParams> {
        Parameters(RegisterEndpointParams {
            name: name.to_string(),
            url: url.to_string(),
            headers: BTreeMap::from([("Authorization".to_string(), "Bearer secret".to_string())]),
            timeout_secs: Some(1),
            retry: None,
            allow_mutations: false,
            tool_prefix: None,
        })
    }

    #[tokio::test]
    async fn test_register_list_remove() {
        let router = router();

        let result = router
            .register_endpoint(register("api", "https://a.example/graphql"))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(text(&result).contains("Registered endpoint `api`"));

        let result = router.list_endpoints().await.unwrap();
        let listing = text(&result);
        assert!(listing.contains("`api`"));
        assert!(listing.contains("Authorization"));
        assert!(!listing.contains("secret"));

        let result = router
            .remove_endpoint(Parameters(RemoveEndpointParams {
                name: "api".to_string(),
            }))
            .await
            .unwrap();
        assert!(text(&result).contains("Removed endpoint `api`"));

        let result = router
            .remove_endpoint(Parameters(RemoveEndpointParams {
                name: "api".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("(`EndpointNotFound`)"));
    }

    #[tokio::test]
    async fn test_invalid_registration_is_tool_error() {
        let result = router()
            .register_endpoint(register("api", "not-a-url"))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("InvalidArgument"));
    }

    #[tokio::test]
    async fn test_generate_mutation_refused_before_fetch() {
        let router = router();
        router
            .register_endpoint(register("api", "http://127.0.0.1:1/graphql"))
            .await
            .unwrap();

        let result = router
            .generate_operation(Parameters(GenerateOperationParams {
                endpoint: "api".to_string(),
                field: "deleteUser".to_string(),
                operation_type: Some("mutation".to_string()),
                operation_name: None,
                max_depth: None,
                include_all_scalars: None,
                variables: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("MutationNotAllowed"));

        // Refused requests never reach the endpoint.
        let service = router.service.lock().await;
        assert_eq!(service.registry().stats("api").unwrap().access_count, 0);
    }

    #[tokio::test]
    async fn test_introspect_unreachable_endpoint_records_error() {
        let router = router();
        router
            .register_endpoint(register("down", "http://127.0.0.1:1/graphql"))
            .await
            .unwrap();

        let result = router
            .introspect_schema(Parameters(IntrospectSchemaParams {
                endpoint: "down".to_string(),
                include_mutations: true,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("SchemaUnavailable"));

        let service = router.service.lock().await;
        let stats = service.registry().stats("down").unwrap();
        assert_eq!(stats.error_count, 1);
    }

    #[tokio::test]
    async fn test_compare_schemas_requires_registered_endpoints() {
        let router = router();
        router
            .register_endpoint(register("a", "http://127.0.0.1:1/graphql"))
            .await
            .unwrap();

        let result = router
            .compare_schemas(Parameters(CompareSchemasParams {
                endpoint_a: "a".to_string(),
                endpoint_b: "b".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("Endpoint 'b' is not registered"));

        // Nothing was fetched.
        let service = router.service.lock().await;
        assert_eq!(service.registry().stats("a").unwrap().access_count, 0);
    }

    #[tokio::test]
    async fn test_compare_unreachable_schemas_records_both() {
        let router = router();
        for name in ["a", "b"] {
            router
                .register_endpoint(register(name, "http://127.0.0.1:1/graphql"))
                .await
                .unwrap();
        }

        let result = router
            .compare_schemas(Parameters(CompareSchemasParams {
                endpoint_a: "a".to_string(),
                endpoint_b: "b".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("SchemaUnavailable"));

        let service = router.service.lock().await;
        assert_eq!(service.registry().stats("a").unwrap().error_count, 1);
        assert_eq!(service.registry().stats("b").unwrap().error_count, 1);
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = router().get_info();
        assert_eq!(info.server_info.name, "graphql-mcp");
        assert!(info.capabilities.tools.is_some());
    }
}
