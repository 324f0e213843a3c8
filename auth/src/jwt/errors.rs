use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Token lifetime must be between 1 and {max} hours, got {actual}")]
    InvalidExpiration { max: i64, actual: i64 },

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
