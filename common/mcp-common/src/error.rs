//! Constructors for protocol-level errors
//!
//! Servers keep their own domain error enum and map it onto these at the
//! tool boundary, through [`IntoMcpError`].

use rmcp::ErrorData as McpError;

/// Return type of tool and resource handlers
pub type McpResult<T> = Result<T, McpError>;

/// Conversion from a server's domain error into a protocol error.
///
/// Servers implement this for their own error enum and decide which
/// protocol error code each variant maps to.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::{invalid_params, invalid_request, IntoMcpError, McpError};
///
/// impl IntoMcpError for NavError {
///     fn into_mcp_error(self) -> McpError {
///         match &self {
///             NavError::AccessDenied(_) => invalid_request(self.to_string()),
///             _ => invalid_params(self.to_string()),
///         }
///     }
/// }
///
/// let descriptor = stat(&ctx, path).await.map_err(IntoMcpError::into_mcp_error)?;
/// ```
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

/// Something went wrong on our side.
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// The caller's arguments are malformed or point at nothing.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::invalid_params;
///
/// if pattern.trim().is_empty() {
///     return Err(invalid_params("pattern cannot be empty"));
/// }
/// ```
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}

/// The arguments are well-formed but the request is refused.
pub fn invalid_request(message: impl Into<String>) -> McpError {
    McpError::invalid_request(message.into(), None)
}

/// No resource lives at the requested URI.
///
/// # Arguments
///
/// * `message` - Shown to the client; name the URI, not a host path
pub fn resource_not_found(message: impl Into<String>) -> McpError {
    McpError::resource_not_found(message.into(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    struct Refused;

    impl IntoMcpError for Refused {
        fn into_mcp_error(self) -> McpError {
            invalid_request("refused")
        }
    }

    #[test]
    fn test_domain_error_conversion() {
        let err = Refused.into_mcp_error();
        assert_eq!(err.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(err.message, "refused");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(invalid_params("x").code, ErrorCode::INVALID_PARAMS);
        assert_eq!(invalid_request("x").code, ErrorCode::INVALID_REQUEST);
        assert_eq!(resource_not_found("x").code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(internal_error("boom").message.contains("boom"));
    }
}
