use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for issuing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256) by default. Only the symmetric HMAC family
/// is accepted because tokens are signed and verified with the same secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
}

impl JwtHandler {
    /// Longest accepted token lifetime (one year).
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `issuer` - Issuer embedded in issued tokens and required on verification
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
        }
    }

    /// Switch the signing algorithm by name (`HS256`, `HS384` or `HS512`).
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown name or a non-HMAC algorithm
    pub fn with_algorithm(mut self, name: &str) -> Result<Self, JwtError> {
        let algorithm = Algorithm::from_str(name)
            .map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                self.algorithm = algorithm;
                Ok(self)
            }
            _ => Err(JwtError::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Check a token lifetime before it is used for issuing.
    ///
    /// # Errors
    /// * `InvalidExpiration` - Not in `1..=MAX_EXPIRATION_HOURS`
    pub fn check_expiration_hours(expiration_hours: i64) -> Result<i64, JwtError> {
        if (1..=Self::MAX_EXPIRATION_HOURS).contains(&expiration_hours) {
            Ok(expiration_hours)
        } else {
            Err(JwtError::InvalidExpiration {
                max: Self::MAX_EXPIRATION_HOURS,
                actual: expiration_hours,
            })
        }
    }

    /// Issue a signed token for `subject` valid for `expiration_hours`.
    ///
    /// # Errors
    /// * `InvalidExpiration` - Lifetime is zero, negative or above the cap
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: &str,
        is_admin: bool,
        expiration_hours: i64,
    ) -> Result<String, JwtError> {
        self.issue_at(subject, is_admin, expiration_hours, Utc::now())
    }

    /// Issue a signed token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        is_admin: bool,
        expiration_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expiration_hours = Self::check_expiration_hours(expiration_hours)?;
        let claims = Claims::for_subject(subject, is_admin, &self.issuer, expiration_hours, now)?;
        self.encode(&claims)
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token against the current time.
    ///
    /// # Errors
    /// * `DecodingFailed` - Token is malformed
    /// * `InvalidToken` - Signature or issuer mismatch
    /// * `MissingClaim` - A required claim is absent
    /// * `TokenExpired` - Token expiry is in the past
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now())
    }

    /// Decode and validate a JWT token as if the current time were `now`.
    ///
    /// No leeway is applied: a token is rejected one second after `exp`.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        // Expiry is checked below against the supplied clock
        validation.validate_exp = false;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidToken("bad signature".to_string()),
                ErrorKind::InvalidIssuer => JwtError::InvalidToken("unexpected issuer".to_string()),
                ErrorKind::InvalidAlgorithm => {
                    JwtError::InvalidToken("unexpected algorithm".to_string())
                }
                ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Verify a token, returning its claims only if it is fully valid.
    ///
    /// Every failure collapses to `None` so callers cannot tell which check
    /// failed. The reason is logged at debug level.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// [`JwtHandler::verify`] against a supplied clock.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        match self.decode_at(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_verify() {
        let handler = JwtHandler::new(SECRET, "appid");

        let token = handler
            .issue("alice@example.com", true, 1)
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = handler.verify(&token).expect("Token should be valid");
        assert_eq!(claims.sub, "alice@example.com");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, "appid");
    }

    #[test]
    fn test_verify_returns_issued_claims() {
        let handler = JwtHandler::new(SECRET, "appid");
        let now = Utc::now();
        let expected = Claims::for_subject("bob@example.com", false, "appid", 1, now).unwrap();

        let token = handler.encode(&expected).expect("Failed to encode token");
        let claims = handler.verify_at(&token, now).expect("Token should be valid");

        assert_eq!(claims, expected);
    }

    #[test]
    fn test_expiry_boundary() {
        let handler = JwtHandler::new(SECRET, "appid");
        let issued_at = Utc::now();

        let token = handler
            .issue_at("alice@example.com", false, 1, issued_at)
            .expect("Failed to issue token");
        let exp = issued_at + Duration::hours(1);

        assert!(handler.verify_at(&token, exp).is_some());
        assert!(handler.verify_at(&token, exp + Duration::seconds(1)).is_none());
        assert!(handler.verify_at(&token, issued_at + Duration::hours(2)).is_none());
        assert_eq!(
            handler.decode_at(&token, issued_at + Duration::hours(2)),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let handler = JwtHandler::new(SECRET, "appid");
        let token = handler
            .issue("alice@example.com", false, 1)
            .expect("Failed to issue token");

        for (index, original) in token.char_indices() {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            assert!(
                handler.verify(&tampered).is_none(),
                "tampering byte {} should invalidate the token",
                index
            );
        }
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!", "appid");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!", "appid");

        let token = handler1
            .issue("alice@example.com", false, 1)
            .expect("Failed to issue token");

        assert!(handler2.verify(&token).is_none());
        assert!(matches!(
            handler2.decode(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_with_wrong_issuer() {
        let issuer = JwtHandler::new(SECRET, "other-app");
        let verifier = JwtHandler::new(SECRET, "appid");

        let token = issuer
            .issue("alice@example.com", false, 1)
            .expect("Failed to issue token");

        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn test_verify_garbage() {
        let handler = JwtHandler::new(SECRET, "appid");

        assert!(handler.verify("invalid.token.here").is_none());
        assert!(handler.verify("").is_none());
        assert!(handler.verify("no-dots-at-all").is_none());
    }

    #[test]
    fn test_algorithm_mismatch_is_rejected() {
        let hs512 = JwtHandler::new(SECRET, "appid")
            .with_algorithm("HS512")
            .expect("HS512 should be supported");
        let hs256 = JwtHandler::new(SECRET, "appid");

        let token = hs512
            .issue("alice@example.com", false, 1)
            .expect("Failed to issue token");

        assert!(hs512.verify(&token).is_some());
        assert!(hs256.verify(&token).is_none());
    }

    #[test]
    fn test_issue_rejects_lifetime_out_of_bounds() {
        let handler = JwtHandler::new(SECRET, "appid");

        for hours in [0, -1, JwtHandler::MAX_EXPIRATION_HOURS + 1, i64::MAX / 3600] {
            assert_eq!(
                handler.issue("alice@example.com", false, hours),
                Err(JwtError::InvalidExpiration {
                    max: JwtHandler::MAX_EXPIRATION_HOURS,
                    actual: hours,
                })
            );
        }
    }

    #[test]
    fn test_issued_token_is_valid_at_issue_time() {
        let handler = JwtHandler::new(SECRET, "appid");
        let now = Utc::now();

        for hours in [1, JwtHandler::MAX_EXPIRATION_HOURS] {
            let token = handler
                .issue_at("alice@example.com", false, hours, now)
                .expect("Failed to issue token");
            assert!(handler.verify_at(&token, now).is_some(), "hours {}", hours);
        }
    }

    #[test]
    fn test_check_expiration_hours() {
        assert_eq!(JwtHandler::check_expiration_hours(1), Ok(1));
        assert_eq!(
            JwtHandler::check_expiration_hours(JwtHandler::MAX_EXPIRATION_HOURS),
            Ok(JwtHandler::MAX_EXPIRATION_HOURS)
        );
        assert!(JwtHandler::check_expiration_hours(0).is_err());
        assert!(JwtHandler::check_expiration_hours(-24).is_err());
    }

    #[test]
    fn test_with_algorithm_rejects_asymmetric() {
        let result = JwtHandler::new(SECRET, "appid").with_algorithm("RS256");
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));

        let result = JwtHandler::new(SECRET, "appid").with_algorithm("nope");
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }
}
