use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a post (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn update_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let post_id = PostId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let command = UpdatePostCommand {
        title: req.title,
        content: req.content,
    };

    state
        .post_service
        .update_post(&post_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
