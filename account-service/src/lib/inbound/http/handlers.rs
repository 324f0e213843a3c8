use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::AccountError;

pub mod login;
pub mod session;
pub mod signup;

pub const USER_EXISTS_MESSAGE: &str = "User already exists.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Infrastructure detail is logged here and replaced by a stable message.
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::EmailAlreadyExists(_) => ApiError::Conflict(USER_EXISTS_MESSAGE.into()),
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into())
            }
            AccountError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            AccountError::InvalidEmail(_) | AccountError::InvalidRole(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            AccountError::StoreUnavailable(detail) => {
                tracing::error!(error = %detail, "Credential store unavailable");
                ApiError::ServiceUnavailable(UNAVAILABLE_MESSAGE.into())
            }
            AccountError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.into())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Payload for responses that only carry a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::errors::EmailError;

    #[test]
    fn test_store_detail_never_reaches_caller() {
        let err = AccountError::StoreUnavailable("connection refused to 10.0.0.5:5432".into());
        assert_eq!(
            ApiError::from(err),
            ApiError::ServiceUnavailable(UNAVAILABLE_MESSAGE.to_string())
        );

        let err = AccountError::Internal("syntax error at or near SELECT".into());
        assert_eq!(
            ApiError::from(err),
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_conflict_and_credentials_messages_are_stable() {
        assert_eq!(
            ApiError::from(AccountError::EmailAlreadyExists("a@x.com".into())),
            ApiError::Conflict(USER_EXISTS_MESSAGE.to_string())
        );
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials),
            ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_validation_errors_are_unprocessable() {
        let err = AccountError::from(EmailError::InvalidFormat("missing @".into()));
        assert!(matches!(
            ApiError::from(err),
            ApiError::UnprocessableEntity(_)
        ));
    }
}
