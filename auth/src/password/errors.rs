use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Work factor too low: minimum {min} rounds, got {actual}")]
    WorkFactorTooLow { min: u32, actual: u32 },
}
