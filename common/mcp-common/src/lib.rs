//! MCP Common - shared plumbing for the MCP servers in this workspace
//!
//! - **Startup**: [`init_tracing`] and the `serve_stdio!` macro
//! - **Results**: [`json_success`] / [`text_success`] for tool responses
//! - **Errors**: small constructors for `rmcp::ErrorData` plus [`IntoMcpError`]
//! - **Embedding**: [`EmbeddableMcp`] for driving a server in-process
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{serve_stdio, json_success};
//!
//! // main.rs
//! serve_stdio!("my_mcp", MyServer::from_env());
//!
//! // a tool body
//! fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     json_success(&self.snapshot())
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{
    internal_error, invalid_params, invalid_request, resource_not_found, IntoMcpError, McpResult,
};
pub use init::init_tracing;
pub use result::{json_success, text_success};

pub use rmcp::{
    model::{CallToolResult, Content, ReadResourceResult, Resource, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
