use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::docs::bundle::DocsBundle;
use crate::executor::rest::RestRequestSpec;
use crate::executor::RequestExecutor;
use crate::soap::spec::SoapRequestSpec;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HealthParams {
    /// Optional value echoed back in the response.
    pub ping: Option<String>,
}

/// MCP surface: four tools over the request executor and the documentation
/// bundle. Tool results are always text; the executors guarantee that API
/// failures come back as readable messages, never as protocol errors.
#[derive(Clone)]
pub struct MceServer {
    tool_router: ToolRouter<Self>,
    executor: Arc<RequestExecutor>,
    docs: Arc<DocsBundle>,
}

#[tool_router]
impl MceServer {
    pub fn new(executor: RequestExecutor, docs: DocsBundle) -> Self {
        Self {
            tool_router: Self::tool_router(),
            executor: Arc::new(executor),
            docs: Arc::new(docs),
        }
    }

    #[tool(description = "Liveness probe. Echoes the optional ping value back.")]
    async fn health(&self, param: Parameters<HealthParams>) -> Result<CallToolResult, ErrorData> {
        let echo = param.0.ping.unwrap_or_else(|| "pong".to_owned());
        Ok(CallToolResult::success(vec![Content::text(format!(
            "ok=true echo={echo}"
        ))]))
    }

    #[tool(
        description = "Call the Marketing Cloud REST API. Builds the URL from the instance REST base and the given path, attaches an OAuth bearer token (scoped to businessUnitId when given) and returns the response body as text. Errors come back as text starting with 'Error:'."
    )]
    async fn rest_request(
        &self,
        param: Parameters<RestRequestSpec>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.executor.execute_rest(&param.0).await;
        Ok(CallToolResult::success(vec![Content::text(result.text)]))
    }

    #[tool(
        description = "Call the Marketing Cloud SOAP API. Supports the Create, Retrieve, Update and Delete actions on any object type (DataExtension payloads get typed serialization). Returns the envelope body, or the fault content, as text."
    )]
    async fn soap_request(
        &self,
        param: Parameters<SoapRequestSpec>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.executor.execute_soap(&param.0).await;
        Ok(CallToolResult::success(vec![Content::text(result.text)]))
    }

    #[tool(description = "Return the bundled Marketing Cloud API documentation as pretty-printed JSON.")]
    async fn documentation(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            self.docs.render(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for MceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Marketing Cloud Engagement bridge: rest_request and soap_request execute \
                 API calls against the configured account; documentation returns the bundled \
                 reference material."
                    .to_owned(),
            ),
        }
    }
}
