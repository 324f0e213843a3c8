use std::convert::Infallible;

use auth::Authenticator;
use auth::Claims;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::credential::errors::AccountError;
use crate::inbound::http::router::AppState;

/// Access level an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Authenticated,
    Admin,
}

/// Authorization state derived from a request's `Authorization` header.
///
/// Built once per request and never changes afterwards. A missing or
/// malformed header and an invalid token all resolve to an anonymous context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationContext {
    claims: Option<Claims>,
}

impl AuthorizationContext {
    pub fn anonymous() -> Self {
        Self { claims: None }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// Resolve the context from a raw `Authorization` header value.
    pub fn from_header(header: Option<&HeaderValue>, authenticator: &Authenticator) -> Self {
        let Some(header) = header else {
            return Self::anonymous();
        };

        let Some(token) = bearer_token(header) else {
            tracing::debug!("Ignoring malformed Authorization header");
            return Self::anonymous();
        };

        match authenticator.validate_token(token) {
            Some(claims) => Self::from_claims(claims),
            None => {
                tracing::debug!("Ignoring invalid bearer token");
                Self::anonymous()
            }
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().is_some_and(|claims| claims.is_admin)
    }

    /// Check the context against the level an operation requires.
    ///
    /// # Errors
    /// * `Unauthorized` - Context does not satisfy `level`
    pub fn require(&self, level: AccessLevel) -> Result<(), AccountError> {
        let allowed = match level {
            AccessLevel::Public => true,
            AccessLevel::Authenticated => self.is_authenticated(),
            AccessLevel::Admin => self.is_admin(),
        };

        if allowed {
            Ok(())
        } else {
            Err(AccountError::Unauthorized(match level {
                AccessLevel::Admin => "Administrator access required".to_string(),
                _ => "Authentication required".to_string(),
            }))
        }
    }
}

/// Extract the token from `Bearer <token>`.
///
/// The scheme is case-insensitive; anything other than exactly two
/// whitespace-separated parts is rejected.
fn bearer_token(header: &HeaderValue) -> Option<&str> {
    let value = header.to_str().ok()?;
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Middleware that resolves the AuthorizationContext and adds it to request extensions.
///
/// Never rejects a request; handlers decide with [`AuthorizationContext::require`].
pub async fn resolve_authorization(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = AuthorizationContext::from_header(
        req.headers().get(header::AUTHORIZATION),
        &state.authenticator,
    );

    req.extensions_mut().insert(context);

    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizationContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthorizationContext>()
            .cloned()
            .unwrap_or_default())
    }
}
