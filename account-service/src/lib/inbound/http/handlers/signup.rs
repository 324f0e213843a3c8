use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::credential::errors::EmailError;
use crate::credential::errors::RoleError;
use crate::credential::models::EmailAddress;
use crate::credential::models::Role;
use crate::credential::models::SignupCommand;
use crate::credential::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(body): Json<SignupRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .auth_service
        .signup(body.try_into_command(&role)?)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::CREATED,
                MessageData {
                    message: "User created successfully.".to_string(),
                },
            )
        })
}

/// HTTP request body for signup (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl SignupRequestBody {
    fn try_into_command(self, role: &str) -> Result<SignupCommand, ParseSignupRequestError> {
        let role = role.parse::<Role>()?;
        let email = EmailAddress::new(self.email)?;
        Ok(SignupCommand::new(email, self.password, role))
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
