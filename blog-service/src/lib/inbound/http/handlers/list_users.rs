use std::str::FromStr;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::Role;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    role: Option<String>,
}

pub async fn list_users<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let role = query
        .role
        .map(|role| Role::from_str(&role))
        .transpose()
        .map_err(UserError::from)?;

    state
        .user_service
        .list_users(role)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect())
        })
}
