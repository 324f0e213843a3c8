use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::authorization::AccessLevel;
use crate::inbound::http::authorization::AuthorizationContext;

/// Describe the identity carried by the caller's bearer token.
pub async fn session(
    context: AuthorizationContext,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    context.require(AccessLevel::Authenticated)?;

    let claims = context
        .claims()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            email: claims.sub.clone(),
            is_admin: claims.is_admin,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub email: String,
    pub is_admin: bool,
    pub expires_at: Option<DateTime<Utc>>,
}
