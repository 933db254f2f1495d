//! In-process execution of MCP servers
//!
//! [`EmbeddableMcp`] exposes a server's tools (and optionally its resources)
//! as plain async calls, with no transport in between. Hosts use it to embed
//! a server; tests use it to drive a server end to end.
//!
//! ```rust,ignore
//! let server = FsNavigatorServer::from_root("/srv/sandbox")?;
//! let result = server
//!     .call_tool("get_file_info", serde_json::json!({ "path": "README.md" }))
//!     .await?;
//! let readme = server.read_resource("file://README.md").await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ReadResourceResult, Resource, Tool};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// The server rejected the call; carries the protocol error message.
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// A server that can be called directly, without stdio or a child process.
///
/// Implementations must be `Send + Sync`; concurrent calls are expected.
/// Servers built with `#[tool_router]` usually answer `list_tools` from
/// `self.tool_router.list_all()` and dispatch `call_tool` by name.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl EmbeddableMcp for FsNavigatorServer {
///     fn server_name(&self) -> &str {
///         "fs-navigator"
///     }
///
///     fn list_tools(&self) -> Vec<Tool> {
///         self.tool_router.list_all()
///     }
///
///     async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
///         match name {
///             "get_file_info" => {
///                 let params: GetFileInfoParams = serde_json::from_value(params)?;
///                 self.get_file_info(Parameters(params)).await.map_err(Into::into)
///             }
///             _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used in MCP configuration files.
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Run the tool `name` with `params` as its JSON argument object.
    ///
    /// # Arguments
    ///
    /// * `name` - Tool name as advertised by [`list_tools`](Self::list_tools)
    /// * `params` - The tool's arguments, as the client would send them
    ///
    /// # Errors
    ///
    /// `ToolNotFound` for an unknown name, `SerdeError` when `params` does
    /// not fit the tool's parameter type, `McpError` when the tool refuses.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Resources currently advertised. Servers without resources keep the default.
    async fn list_resources(&self) -> EmbeddableResult<Vec<Resource>> {
        Ok(Vec::new())
    }

    async fn read_resource(&self, uri: &str) -> EmbeddableResult<ReadResourceResult> {
        Err(EmbeddableError::ResourceNotFound(uri.to_string()))
    }

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ToolsOnly;

    #[async_trait]
    impl EmbeddableMcp for ToolsOnly {
        fn server_name(&self) -> &str {
            "tools-only"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, _params: Value) -> EmbeddableResult<CallToolResult> {
            Err(EmbeddableError::ToolNotFound(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = ToolsOnly.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_resource_defaults() {
        assert!(ToolsOnly.list_resources().await.unwrap().is_empty());

        let result = ToolsOnly.read_resource("file://anything").await;
        assert!(matches!(result, Err(EmbeddableError::ResourceNotFound(uri)) if uri == "file://anything"));
    }

    #[test]
    fn test_mcp_error_conversion() {
        let err: EmbeddableError = rmcp::ErrorData::invalid_params("bad path", None).into();
        assert_eq!(err.to_string(), "mcp error: bad path");
    }
}
