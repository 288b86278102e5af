use thiserror::Error;

use authorizer_infra::ServiceError;

/// Failure of the request/response stream itself (not a business outcome).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("malformed request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write response: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
