use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Access token claims.
///
/// Carries the caller identity (`sub`, an email address), the privilege flag
/// and the standard issuer/expiry claims checked on every verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,

    /// Administrator privilege flag
    #[serde(default)]
    pub is_admin: bool,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create claims for an authenticated subject.
    ///
    /// # Arguments
    /// * `subject` - Account identifier (email)
    /// * `is_admin` - Whether the account holds administrator privileges
    /// * `issuer` - Issuer identifier embedded in the token
    /// * `expiration_hours` - Hours until token expires
    /// * `now` - Issue instant
    ///
    /// # Returns
    /// Claims with `exp = now + expiration_hours`
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable time range
    pub fn for_subject(
        subject: impl ToString,
        is_admin: bool,
        issuer: impl ToString,
        expiration_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, JwtError> {
        let expiration = Duration::try_hours(expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::EncodingFailed(format!(
                    "expiry of {} hours is out of range",
                    expiration_hours
                ))
            })?;

        Ok(Self {
            sub: subject.to_string(),
            is_admin,
            iss: issuer.to_string(),
            exp: expiration.timestamp(),
            iat: Some(now.timestamp()),
        })
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
