//! Tool response builders
//!
//! Every tool in this workspace answers with a single text content item,
//! either a JSON document or verbatim text.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Pretty-printed JSON of `data` as a single text content item.
///
/// # Arguments
///
/// * `data` - Any type that implements `Serialize`
///
/// # Returns
///
/// * `Ok(CallToolResult)` with pretty-printed JSON content
/// * `Err(McpError)` (internal error) if serialization fails
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::json_success;
///
/// async fn get_file_info(&self, path: &str) -> McpResult<CallToolResult> {
///     let descriptor = metadata::stat(&self.ctx, path).await.map_err(nav_error_to_mcp)?;
///     json_success(&descriptor)
/// }
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// `text` verbatim as a single text content item.
///
/// Use this when the tool's output already is the answer, such as file
/// content, rather than a structure to serialize.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::text_success;
///
/// let content = reader::read_content(&ctx, "README.md", ReadOptions::default()).await?;
/// Ok(text_success(content))
/// ```
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn first_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(t) => t.text.as_str(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[derive(Serialize)]
    struct Listing {
        path: String,
        count: usize,
    }

    #[test]
    fn test_json_success() {
        let data = Listing {
            path: "src".to_string(),
            count: 3,
        };
        let result = json_success(&data).unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);

        assert!(first_text(&result).contains("\"count\": 3"));
    }

    #[test]
    fn test_text_success() {
        let result = text_success("fn main() {}\n");
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(first_text(&result), "fn main() {}\n");
    }
}
