use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UsernameError;

pub async fn create_user<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    full_name: String,
    username: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Full name must not be empty")]
    EmptyFullName,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        if self.full_name.trim().is_empty() {
            return Err(ParseCreateUserRequestError::EmptyFullName);
        }
        if self.password.is_empty() {
            return Err(ParseCreateUserRequestError::EmptyPassword);
        }

        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let role = match self.role {
            Some(role) => Role::from_str(&role)?,
            None => Role::default(),
        };

        Ok(CreateUserCommand {
            full_name: self.full_name,
            username,
            email,
            password: self.password,
            role,
        })
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
