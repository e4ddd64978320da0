use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn delete_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DeletePostResponseData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let post_id = PostId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .post_service
        .delete_post(&post_id)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                DeletePostResponseData {
                    message: "Post deleted successfully".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePostResponseData {
    pub message: String,
}
