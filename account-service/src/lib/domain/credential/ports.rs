use async_trait::async_trait;
use auth::AuthenticationResult;

use crate::credential::errors::AccountError;
use crate::credential::models::Credential;
use crate::credential::models::EmailAddress;
use crate::credential::models::LoginCommand;
use crate::credential::models::SignupCommand;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new credential.
    ///
    /// # Arguments
    /// * `command` - Validated email, plaintext password and requested role
    ///
    /// # Returns
    /// Created credential
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Credential store could not be reached
    /// * `Internal` - Password hashing failed
    async fn signup(&self, command: SignupCommand) -> Result<Credential, AccountError>;

    /// Exchange email and password for an access token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `StoreUnavailable` - Credential store could not be reached
    /// * `Internal` - Token generation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, AccountError>;
}

/// Persistence operations for credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve credential by email address.
    ///
    /// # Arguments
    /// * `email` - Normalised email address
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store unreachable or call timed out
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AccountError>;

    /// Persist a new credential.
    ///
    /// Callers check for an existing email first; the store still reports a
    /// uniqueness conflict if two inserts race.
    ///
    /// # Arguments
    /// * `credential` - Credential to insert
    ///
    /// # Returns
    /// Inserted credential
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Store unreachable or call timed out
    async fn insert(&self, credential: Credential) -> Result<Credential, AccountError>;
}
