use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn list_posts<UR, PR>(
    State(state): State<AppState<UR, PR>>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .post_service
        .list_posts()
        .await
        .map_err(ApiError::from)
        .map(|posts| {
            ApiSuccess::new(StatusCode::OK, posts.iter().map(PostData::from).collect())
        })
}
