//! Error types for capabilities resolution.

use thiserror::Error;

/// Result type alias using OwsError.
pub type OwsResult<T> = Result<T, OwsError>;

/// Primary error type for capabilities and catalogue operations.
#[derive(Debug, Error)]
pub enum OwsError {
    // === Transport Errors ===
    #[error("I/O error: {0}")]
    Io(String),

    // === Service Errors ===
    #[error("Service exception ({}): {message}", .code.as_deref().unwrap_or("NoApplicableCode"))]
    ServiceFault {
        code: Option<String>,
        message: String,
    },

    #[error("Failed to parse capabilities: {0}")]
    ParseFault(String),

    // === Caller Errors ===
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OwsError {
    /// Service fault without an exception code.
    pub fn service(message: impl Into<String>) -> Self {
        OwsError::ServiceFault {
            code: None,
            message: message.into(),
        }
    }

    /// Name of the fault family this error belongs to.
    pub fn fault_kind(&self) -> &'static str {
        match self {
            OwsError::Io(_) => "IOFault",
            OwsError::ServiceFault { .. } => "ServiceFault",
            OwsError::ParseFault(_) => "ParseFault",
            _ => "InvalidRequest",
        }
    }

    /// HTTP status code a gateway should answer with for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            OwsError::UnknownProtocol(_) | OwsError::InvalidUrl(_) => 400,

            OwsError::Io(_) | OwsError::ServiceFault { .. } | OwsError::ParseFault(_) => 502,

            OwsError::Config(_) => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for OwsError {
    fn from(err: std::io::Error) -> Self {
        OwsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OwsError {
    fn from(err: serde_json::Error) -> Self {
        OwsError::ParseFault(format!("JSON error: {}", err))
    }
}

impl From<quick_xml::Error> for OwsError {
    fn from(err: quick_xml::Error) -> Self {
        OwsError::ParseFault(format!("XML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kinds() {
        assert_eq!(OwsError::Io("refused".into()).fault_kind(), "IOFault");
        assert_eq!(OwsError::service("boom").fault_kind(), "ServiceFault");
        assert_eq!(OwsError::ParseFault("bad".into()).fault_kind(), "ParseFault");
    }

    #[test]
    fn test_service_fault_display_includes_code() {
        let err = OwsError::ServiceFault {
            code: Some("LayerNotDefined".into()),
            message: "no such layer".into(),
        };
        assert_eq!(
            err.to_string(),
            "Service exception (LayerNotDefined): no such layer"
        );
        assert_eq!(
            OwsError::service("x").to_string(),
            "Service exception (NoApplicableCode): x"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(OwsError::UnknownProtocol("foo".into()).http_status_code(), 400);
        assert_eq!(OwsError::Io("timeout".into()).http_status_code(), 502);
    }
}
