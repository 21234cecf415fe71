pub mod client;
pub mod types;

pub use client::*;
pub use types::*;

use thiserror::Error;

/// Errors from the inference gateway ports.
///
/// `NotReachable` and `Timeout` are transient — the client retries them
/// with backoff. `Api` and `ErrorPayload` come from the service itself
/// and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("inference gateway is not reachable at {0}")]
    NotReachable(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("gateway returned error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("inference service error: {0}")]
    ErrorPayload(String),

    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

impl GatewayError {
    /// Transient transport failures are worth retrying; service-reported
    /// errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReachable(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_transient() {
        assert!(GatewayError::NotReachable("http://x".into()).is_transient());
        assert!(GatewayError::Timeout(120).is_transient());
    }

    #[test]
    fn service_errors_are_permanent() {
        let api = GatewayError::Api {
            status: 429,
            message: "quota".into(),
        };
        assert!(!api.is_transient());
        assert!(!GatewayError::ErrorPayload("bad request".into()).is_transient());
        assert!(!GatewayError::MalformedResponse("truncated".into()).is_transient());
    }
}
