use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserIdError;

pub async fn create_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Json(body): Json<CreatePostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .post_service
        .create_post(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

/// HTTP request body for creating a post (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePostRequest {
    title: String,
    content: String,
    author_id: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreatePostRequestError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Invalid author ID: {0}")]
    AuthorId(#[from] UserIdError),
}

impl CreatePostRequest {
    fn try_into_command(self) -> Result<CreatePostCommand, ParseCreatePostRequestError> {
        if self.title.trim().is_empty() {
            return Err(ParseCreatePostRequestError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ParseCreatePostRequestError::EmptyContent);
        }

        let author_id = UserId::from_string(&self.author_id)?;

        Ok(CreatePostCommand {
            title: self.title,
            content: self.content,
            author_id,
        })
    }
}

impl From<ParseCreatePostRequestError> for ApiError {
    fn from(err: ParseCreatePostRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
