use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::SaltString;
use pbkdf2::Params;
use pbkdf2::Pbkdf2;

use super::errors::PasswordError;
use super::scheme::HashScheme;

/// Password hashing implementation.
///
/// New hashes always use PBKDF2-HMAC-SHA256 in PHC string format. Verification
/// also accepts the legacy formats listed in [`HashScheme`].
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    rounds: u32,
}

impl PasswordHasher {
    /// Default PBKDF2 work factor.
    pub const DEFAULT_ROUNDS: u32 = 30_000;

    /// Lowest work factor accepted by [`PasswordHasher::with_rounds`].
    pub const MIN_ROUNDS: u32 = 1_000;

    const OUTPUT_LENGTH: usize = 32;

    /// Create a new password hasher with the default work factor.
    pub fn new() -> Self {
        Self {
            rounds: Self::DEFAULT_ROUNDS,
        }
    }

    /// Create a password hasher with a custom PBKDF2 work factor.
    ///
    /// # Errors
    /// * `WorkFactorTooLow` - `rounds` is below [`PasswordHasher::MIN_ROUNDS`]
    pub fn with_rounds(rounds: u32) -> Result<Self, PasswordError> {
        if rounds < Self::MIN_ROUNDS {
            return Err(PasswordError::WorkFactorTooLow {
                min: Self::MIN_ROUNDS,
                actual: rounds,
            });
        }
        Ok(Self { rounds })
    }

    /// Configured PBKDF2 work factor.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses PBKDF2-HMAC-SHA256 with a random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params {
            rounds: self.rounds,
            output_length: Self::OUTPUT_LENGTH,
        };

        Pbkdf2
            .hash_password_customized(password.as_bytes(), None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in any accepted [`HashScheme`]
    ///
    /// # Returns
    /// True if password matches, false otherwise (including malformed hashes)
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let scheme = HashScheme::detect(hash);
        let is_valid = scheme.verify(password, hash);

        if !is_valid && scheme == HashScheme::Unknown {
            tracing::debug!("Password hash has an unrecognised format");
        }

        is_valid
    }

    /// Whether a stored hash should be replaced by one from [`PasswordHasher::hash`].
    ///
    /// True for every legacy scheme and for PBKDF2 hashes weaker than the
    /// configured work factor.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        if HashScheme::detect(hash) != HashScheme::Pbkdf2 {
            return true;
        }

        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };

        if parsed.algorithm.as_str() != "pbkdf2-sha256" {
            return true;
        }

        Params::try_from(&parsed)
            .map(|params| params.rounds < self.rounds)
            .unwrap_or(true)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
