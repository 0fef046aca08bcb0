use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Provider request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid request: {message}")]
    InvalidInputError { message: String },

    #[error("{message}")]
    UpstreamRejected {
        message: String,
        status: u16,
        body: Value,
        /// When set, the provider's error status is echoed to the caller
        /// instead of the blanket 400.
        passthrough: bool,
    },
}

impl ProxyError {
    /// Upstream replied with a non-2xx status for a call that cannot be
    /// absorbed into a step-failure list. Reported to callers as a 400.
    pub fn upstream(message: impl Into<String>, status: u16, body: Value) -> Self {
        ProxyError::UpstreamRejected {
            message: message.into(),
            status,
            body,
            passthrough: false,
        }
    }

    /// Same as [`upstream`](Self::upstream), but the provider's own error
    /// status is surfaced to the caller. Used on the aggregator hops.
    pub fn upstream_passthrough(message: impl Into<String>, status: u16, body: Value) -> Self {
        ProxyError::UpstreamRejected {
            message: message.into(),
            status,
            body,
            passthrough: true,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ProxyError::InvalidInputError {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProxyError::TransportError(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_keeps_provider_body() {
        let err = ProxyError::upstream(
            "Failed to get access token",
            401,
            serde_json::json!({"error": "invalid_client"}),
        );

        match err {
            ProxyError::UpstreamRejected { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body["error"], "invalid_client");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ProxyError::invalid_input("operators array is required");
        assert_eq!(
            err.to_string(),
            "Invalid request: operators array is required"
        );
    }
}
