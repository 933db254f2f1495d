//! Tool and resource handlers
//!
//! Each handler turns typed params into a core call and renders the outcome
//! for the protocol. Core errors are mapped here and nowhere else.

use base64::Engine as _;
use mcp_common::{
    internal_error, invalid_params, invalid_request, json_success, resource_not_found,
    text_success, CallToolResult, IntoMcpError, McpError, McpResult,
};
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};

use crate::context::RootContext;
use crate::metadata;
use crate::params::*;
use crate::reader::{self, ReadOptions};
use crate::search::{self, SearchOptions};
use crate::types::NavError;
use crate::walker::{self, ListOptions};

pub const RESOURCE_SCHEME: &str = "file://";

// ============================================================================
// Helper Functions
// ============================================================================

impl IntoMcpError for NavError {
    fn into_mcp_error(self) -> McpError {
        match &self {
            NavError::AccessDenied(_)
            | NavError::PermissionDenied(_)
            | NavError::SizeExceeded { .. } => invalid_request(self.to_string()),
            NavError::NotFound(_) | NavError::InvalidArgument(_) | NavError::Decode { .. } => {
                invalid_params(self.to_string())
            }
            NavError::FileInfo { .. }
            | NavError::Config(_)
            | NavError::Io { .. }
            | NavError::Internal(_) => internal_error(self.to_string()),
        }
    }
}

pub fn nav_error_to_mcp(err: NavError) -> McpError {
    err.into_mcp_error()
}

/// Same as [`nav_error_to_mcp`], except a missing file is a missing resource.
fn resource_error(err: NavError, uri: &str) -> McpError {
    match err {
        NavError::NotFound(_) => resource_not_found(format!("Resource not found: {}", uri)),
        other => other.into_mcp_error(),
    }
}

// ============================================================================
// Tool Handlers
// ============================================================================

pub async fn search_files(
    ctx: &RootContext,
    params: SearchFilesParams,
) -> McpResult<CallToolResult> {
    let options = SearchOptions {
        max_results: params.max_results,
        include_hidden: params.include_hidden,
    };
    let result = search::search(ctx, &params.pattern, &params.directory, options)
        .await
        .map_err(nav_error_to_mcp)?;

    json_success(&result)
}

pub async fn read_directory(
    ctx: &RootContext,
    params: ReadDirectoryParams,
) -> McpResult<CallToolResult> {
    let options = ListOptions {
        include_hidden: params.include_hidden,
        recursive: params.recursive,
        max_depth: params.max_depth,
    };
    let listing = walker::list_directory(ctx, &params.path, options)
        .await
        .map_err(nav_error_to_mcp)?;

    json_success(&listing)
}

pub async fn get_file_info(
    ctx: &RootContext,
    params: GetFileInfoParams,
) -> McpResult<CallToolResult> {
    let descriptor = metadata::stat(ctx, &params.path)
        .await
        .map_err(nav_error_to_mcp)?;

    json_success(&descriptor)
}

pub async fn read_file_content(
    ctx: &RootContext,
    params: ReadFileContentParams,
) -> McpResult<CallToolResult> {
    let options = ReadOptions {
        encoding: params.encoding,
        max_size: params.max_size,
    };
    let content = reader::read_content(ctx, &params.path, options)
        .await
        .map_err(nav_error_to_mcp)?;

    Ok(text_success(content))
}

// ============================================================================
// Resource Handlers
// ============================================================================

/// Regular files directly under the root, as `file://<relative-path>`.
pub async fn list_resources(ctx: &RootContext) -> McpResult<Vec<Resource>> {
    let listing = walker::list_directory(ctx, ".", ListOptions::default())
        .await
        .map_err(nav_error_to_mcp)?;

    let resources = listing
        .entries
        .into_iter()
        .filter(|entry| entry.is_file)
        .map(|entry| {
            let mut resource = RawResource::new(
                format!("{}{}", RESOURCE_SCHEME, entry.relative_path),
                entry.name,
            );
            resource.description = Some(format!("File: {}", entry.relative_path));
            resource.mime_type = entry.content_type;
            resource.no_annotation()
        })
        .collect();

    Ok(resources)
}

/// Read `file://<relative-path>` with the configured size ceiling.
///
/// UTF-8 content comes back as text, anything else as a base64 blob.
pub async fn read_resource(ctx: &RootContext, uri: &str) -> McpResult<ReadResourceResult> {
    let Some(relative) = uri.strip_prefix(RESOURCE_SCHEME) else {
        return Err(resource_not_found(format!(
            "Unsupported resource URI: {}",
            uri
        )));
    };

    let raw = reader::read_bytes(ctx, relative, None)
        .await
        .map_err(|e| resource_error(e, uri))?;

    let contents = match String::from_utf8(raw.bytes) {
        Ok(text) => ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(raw.content_type.unwrap_or_else(|| "text/plain".to_string())),
            text,
            meta: None,
        },
        Err(e) => ResourceContents::BlobResourceContents {
            uri: uri.to_string(),
            mime_type: Some(
                raw.content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            ),
            blob: base64::engine::general_purpose::STANDARD.encode(e.as_bytes()),
            meta: None,
        },
    };

    Ok(ReadResourceResult {
        contents: vec![contents],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Config;
    use rmcp::model::ErrorCode;
    use std::path::Path;

    fn context(root: &Path) -> RootContext {
        RootContext::new(&Config {
            root: root.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_error_mapping() {
        let code = |e: NavError| nav_error_to_mcp(e).code;
        assert_eq!(code(NavError::AccessDenied("..".into())), ErrorCode::INVALID_REQUEST);
        assert_eq!(
            code(NavError::SizeExceeded { size: 2, limit: 1 }),
            ErrorCode::INVALID_REQUEST
        );
        assert_eq!(code(NavError::NotFound("x".into())), ErrorCode::INVALID_PARAMS);
        assert_eq!(code(NavError::Internal("x".into())), ErrorCode::INTERNAL_ERROR);
        assert_eq!(
            resource_error(NavError::NotFound("x".into()), "file://x").code,
            ErrorCode::RESOURCE_NOT_FOUND
        );
    }

    #[test]
    fn test_size_error_message_carries_both_sizes() {
        let err = nav_error_to_mcp(NavError::SizeExceeded {
            size: 2048,
            limit: 1024,
        });
        assert!(err.message.contains("2048"));
        assert!(err.message.contains("1024"));
    }

    #[tokio::test]
    async fn test_access_denied_message_has_no_host_path() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let err = get_file_info(
            &ctx,
            GetFileInfoParams {
                path: "../../../etc/passwd".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(err.message.contains("../../../etc/passwd"));
        assert!(!err.message.contains(&*ctx.root().to_string_lossy()));
    }

    #[tokio::test]
    async fn test_list_resources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::write(dir.path().join(".secret"), "x").unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        let ctx = context(dir.path());

        let resources = list_resources(&ctx).await.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, "file://package.json");
        assert_eq!(resources[0].raw.mime_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_read_text_resource() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();
        let ctx = context(dir.path());

        let result = read_resource(&ctx, "file://notes.md").await.unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                uri,
                mime_type,
                text,
                ..
            } => {
                assert_eq!(uri, "file://notes.md");
                assert_eq!(mime_type.as_deref(), Some("text/markdown"));
                assert_eq!(text, "# Notes\n");
            }
            other => panic!("expected text contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_binary_resource() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pixel.png"), [0x89, b'P', b'N', b'G', 0xff]).unwrap();
        let ctx = context(dir.path());

        let result = read_resource(&ctx, "file://pixel.png").await.unwrap();
        match &result.contents[0] {
            ResourceContents::BlobResourceContents {
                mime_type, blob, ..
            } => {
                assert_eq!(mime_type.as_deref(), Some("image/png"));
                assert_eq!(blob, "iVBOR/8=");
            }
            other => panic!("expected blob contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resource_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let missing = read_resource(&ctx, "file://missing.txt").await.unwrap_err();
        assert_eq!(missing.code, ErrorCode::RESOURCE_NOT_FOUND);

        let escape = read_resource(&ctx, "file://../../etc/passwd").await.unwrap_err();
        assert_eq!(escape.code, ErrorCode::INVALID_REQUEST);

        let scheme = read_resource(&ctx, "http://example.com/").await.unwrap_err();
        assert_eq!(scheme.code, ErrorCode::RESOURCE_NOT_FOUND);
    }
}
