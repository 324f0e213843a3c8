use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use chrono::Utc;

use crate::credential::errors::AccountError;
use crate::credential::models::Credential;
use crate::credential::models::CredentialId;
use crate::credential::models::LoginCommand;
use crate::credential::models::Role;
use crate::credential::models::SignupCommand;
use crate::credential::ports::AuthServicePort;
use crate::credential::ports::CredentialStore;

/// Domain service implementation for signup and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    token_expiration_hours: i64,
    /// Verified against on unknown emails so both login failures cost the same
    placeholder_hash: Option<String>,
}

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-never-matches";

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `token_expiration_hours` - Lifetime of issued access tokens
    pub fn new(
        store: Arc<CS>,
        authenticator: Arc<Authenticator>,
        token_expiration_hours: i64,
    ) -> Self {
        let placeholder_hash = match authenticator.hash_password(PLACEHOLDER_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare placeholder password hash");
                None
            }
        };

        Self {
            store,
            authenticator,
            token_expiration_hours,
            placeholder_hash,
        }
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn signup(&self, command: SignupCommand) -> Result<Credential, AccountError> {
        // Not atomic with the insert below; the store's unique constraint
        // settles concurrent signups for the same email.
        if self.store.find_by_email(&command.email).await?.is_some() {
            tracing::info!(email = %command.email, "Signup rejected: email already registered");
            return Err(AccountError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))?;

        let credential = Credential {
            id: CredentialId::new(),
            email: command.email,
            password_hash,
            is_admin: command.role == Role::Admin,
            created_at: Utc::now(),
        };

        let created = self.store.insert(credential).await?;

        tracing::info!(
            credential_id = %created.id,
            role = %command.role,
            "Credential created"
        );

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, AccountError> {
        let Some(credential) = self.store.find_by_email(&command.email).await? else {
            if let Some(placeholder_hash) = &self.placeholder_hash {
                self.authenticator
                    .verify_password(&command.password, placeholder_hash);
            }
            tracing::debug!("Login rejected: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &credential.password_hash,
                credential.email.as_str(),
                credential.is_admin,
                self.token_expiration_hours,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(credential_id = %credential.id, "Login rejected: password mismatch");
                    AccountError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    AccountError::Internal(format!("Password verification failed: {}", err))
                }
                AuthenticationError::JwtError(err) => {
                    AccountError::Internal(format!("Token generation failed: {}", err))
                }
            })?;

        if self.authenticator.needs_rehash(&credential.password_hash) {
            tracing::debug!(
                credential_id = %credential.id,
                "Stored password hash uses an outdated scheme"
            );
        }

        tracing::info!(
            credential_id = %credential.id,
            is_admin = credential.is_admin,
            "Login succeeded"
        );

        Ok(result)
    }
}
