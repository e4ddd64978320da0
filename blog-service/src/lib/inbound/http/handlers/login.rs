use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn login<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .auth_service
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
}

impl From<&AuthResult> for LoginResponseData {
    fn from(result: &AuthResult) -> Self {
        Self {
            access_token: result.access_token.clone(),
            user_id: result.user_id.to_string(),
            email: result.email.as_str().to_string(),
        }
    }
}
