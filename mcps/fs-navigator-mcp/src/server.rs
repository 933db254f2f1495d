//! MCP server exposing read-only navigation of one root directory
//!
//! Tool bodies live in the handlers module; this file only wires them to
//! rmcp and to [`EmbeddableMcp`].

use std::path::PathBuf;
use std::sync::Arc;

use mcp_common::{
    async_trait, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
        Resource, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};
use serde_json::Value;

use crate::context::RootContext;
use crate::handlers;
use crate::params::*;
use crate::types::{Config, NavResult};

const INSTRUCTIONS: &str = "Read-only filesystem navigator. All paths are relative to a single \
     configured root directory; nothing outside it can be reached and nothing is ever modified. \
     Tools: search_files (glob search), read_directory (listing, optionally recursive), \
     get_file_info (metadata), read_file_content (size-limited read). Root-level files are also \
     exposed as file:// resources.";

/// The filesystem navigator MCP server
#[derive(Clone)]
pub struct FsNavigatorServer {
    ctx: Arc<RootContext>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl FsNavigatorServer {
    /// Fails when the configured root is missing or not a directory, or an
    /// exclusion pattern does not compile.
    pub fn with_config(config: Config) -> NavResult<Self> {
        let ctx = RootContext::new(&config)?;

        Ok(Self {
            ctx: Arc::new(ctx),
            tool_router: Self::tool_router(),
        })
    }

    /// Default limits and exclusions around `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> NavResult<Self> {
        Self::with_config(Config {
            root: root.into(),
            ..Default::default()
        })
    }

    pub fn context(&self) -> &RootContext {
        &self.ctx
    }

    #[tool(
        description = "Find files whose path (relative to the search directory) matches a glob pattern. Returns the total match count and up to maxResults file descriptors."
    )]
    async fn search_files(
        &self,
        Parameters(params): Parameters<SearchFilesParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::search_files(&self.ctx, params).await
    }

    #[tool(
        description = "List a directory. With recursive=true, subdirectories are listed too, in pre-order, down to maxDepth levels."
    )]
    async fn read_directory(
        &self,
        Parameters(params): Parameters<ReadDirectoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::read_directory(&self.ctx, params).await
    }

    #[tool(
        description = "Get metadata for a file or directory: size, kind, modification time, permissions and content type."
    )]
    async fn get_file_info(
        &self,
        Parameters(params): Parameters<GetFileInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_file_info(&self.ctx, params).await
    }

    #[tool(
        description = "Read a file's content as text. Files larger than the size limit are refused. Binary files can be read with encoding 'base64' or 'hex'."
    )]
    async fn read_file_content(
        &self,
        Parameters(params): Parameters<ReadFileContentParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::read_file_content(&self.ctx, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for FsNavigatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = handlers::list_resources(&self.ctx).await?;
        Ok(ListResourcesResult::with_all_items(resources))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        handlers::read_resource(&self.ctx, &request.uri).await
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for FsNavigatorServer {
    fn server_name(&self) -> &str {
        "fs-navigator"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "search_files" => {
                let params: SearchFilesParams = serde_json::from_value(params)?;
                self.search_files(Parameters(params)).await.map_err(Into::into)
            }
            "read_directory" => {
                let params: ReadDirectoryParams = serde_json::from_value(params)?;
                self.read_directory(Parameters(params)).await.map_err(Into::into)
            }
            "get_file_info" => {
                let params: GetFileInfoParams = serde_json::from_value(params)?;
                self.get_file_info(Parameters(params)).await.map_err(Into::into)
            }
            "read_file_content" => {
                let params: ReadFileContentParams = serde_json::from_value(params)?;
                self.read_file_content(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }

    async fn list_resources(&self) -> EmbeddableResult<Vec<Resource>> {
        handlers::list_resources(&self.ctx).await.map_err(Into::into)
    }

    async fn read_resource(&self, uri: &str) -> EmbeddableResult<ReadResourceResult> {
        handlers::read_resource(&self.ctx, uri).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(t) => &t.text,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_tools_registered() {
        let dir = tempfile::tempdir().unwrap();
        let server = FsNavigatorServer::from_root(dir.path()).unwrap();

        let mut names: Vec<String> = server
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_file_info",
                "read_directory",
                "read_file_content",
                "search_files"
            ]
        );
    }

    #[test]
    fn test_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let server = FsNavigatorServer::from_root(dir.path()).unwrap();

        let info = rmcp::ServerHandler::get_info(&server);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsNavigatorServer::from_root(dir.path().join("nope")).is_err());
    }

    #[tokio::test]
    async fn test_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hi").unwrap();
        let server = FsNavigatorServer::from_root(dir.path()).unwrap();

        let result = server
            .call_tool("read_file_content", json!({ "path": "hello.txt" }))
            .await
            .unwrap();
        assert_eq!(text(&result), "hi");

        let unknown = server.call_tool("write_file", json!({})).await;
        assert!(matches!(unknown, Err(EmbeddableError::ToolNotFound(_))));

        let malformed = server.call_tool("get_file_info", json!({})).await;
        assert!(matches!(malformed, Err(EmbeddableError::SerdeError(_))));
    }
}
